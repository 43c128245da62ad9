const RTL_LANGUAGES: &[&str] = &[
    "ar", "ara", "arc", "ckb", "dv", "div", "fa", "fas", "per", "he", "heb", "iw", "ji", "ks",
    "kas", "ps", "pus", "sd", "snd", "syr", "ug", "uig", "ur", "urd", "yi", "yid",
];

const RTL_SCRIPTS: &[&str] = &["arab", "hebr", "thaa", "syrc", "nkoo", "adlm"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

pub fn direction_for(language: &str) -> TextDirection {
    let subtags = split_subtags(language);
    let Some(primary) = subtags.first() else {
        return TextDirection::Ltr;
    };
    if subtags
        .iter()
        .skip(1)
        .any(|subtag| subtag.len() == 4 && RTL_SCRIPTS.contains(&subtag.as_str()))
    {
        return TextDirection::Rtl;
    }
    if RTL_LANGUAGES.contains(&primary.as_str()) {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    }
}

/// Open Graph locale form: `pt-br` becomes `pt_BR`.
pub fn og_locale(language: &str) -> String {
    let subtags = split_subtags(language);
    let mut parts = Vec::with_capacity(subtags.len());
    for (idx, subtag) in subtags.iter().enumerate() {
        if idx == 0 {
            parts.push(subtag.clone());
        } else if subtag.len() == 2 {
            parts.push(subtag.to_ascii_uppercase());
        } else if subtag.len() == 4 {
            let mut chars = subtag.chars();
            let title = chars
                .next()
                .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
                .unwrap_or_default();
            parts.push(title);
        } else {
            parts.push(subtag.clone());
        }
    }
    parts.join("_")
}

fn split_subtags(language: &str) -> Vec<String> {
    language
        .trim()
        .split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect()
}
