use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

pub type TextMap = BTreeMap<String, String>;

static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__ph_[0-9a-f]{32}__").expect("Invalid placeholder regex"));

/// Content-addressed token for `text`. Only the trimmed text is hashed.
pub fn placeholder_for(text: &str) -> String {
    format!("__ph_{:x}__", md5::compute(text.trim().as_bytes()))
}

pub fn is_placeholder(value: &str) -> bool {
    PLACEHOLDER_REGEX
        .find(value)
        .map(|found| found.start() == 0 && found.end() == value.len())
        .unwrap_or(false)
}

pub(crate) fn placeholder_regex() -> &'static Regex {
    &PLACEHOLDER_REGEX
}

/// Placeholders of `text_map` that have no value in `translated`, in key order.
pub fn missing_placeholders(text_map: &TextMap, translated: &TextMap) -> Vec<String> {
    text_map
        .keys()
        .filter(|key| !translated.contains_key(*key))
        .cloned()
        .collect()
}

#[derive(Debug, Default, Clone)]
pub struct PlaceholderTable {
    map: TextMap,
}

impl PlaceholderTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, placeholder: &str, original: &str) {
        self.map
            .entry(placeholder.to_string())
            .or_insert_with(|| original.to_string());
    }

    /// Stores `serialized` under the placeholder of its own trimmed form, so
    /// the key always derives from the exact markup that is substituted back.
    pub(crate) fn register(&mut self, serialized: &str) -> String {
        let placeholder = placeholder_for(serialized);
        self.set(&placeholder, serialized);
        placeholder
    }

    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.map.get(placeholder).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn into_map(self) -> TextMap {
        self.map
    }
}

/// Escapes a raw DOM string into the form it takes inside serialized HTML,
/// valid both in text content and in double-quoted attribute values.
pub(crate) fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}
