use regex::Captures;
use tracing::{debug, warn};

use super::placeholder::{TextMap, placeholder_regex};
use super::tag_edit::rewrite_start_tags;
use crate::languages::{direction_for, og_locale};

#[derive(Debug, Clone)]
pub struct ReconstructOptions {
    pub language: Option<String>,
    pub set_lang: bool,
    pub set_direction: bool,
    pub overwrite_og_locale: bool,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            language: None,
            set_lang: true,
            set_direction: true,
            overwrite_og_locale: false,
        }
    }
}

impl ReconstructOptions {
    pub fn for_language(language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            ..Self::default()
        }
    }
}

/// Substitutes every placeholder in `modified_html` with its translated
/// value. Unknown placeholders stay in place. Substituted values are not
/// scanned again.
pub fn reconstruct_html(
    modified_html: &str,
    translated: &TextMap,
    options: &ReconstructOptions,
) -> String {
    let mut missing = 0usize;
    let substituted = placeholder_regex()
        .replace_all(modified_html, |caps: &Captures| match translated.get(&caps[0]) {
            Some(value) => value.clone(),
            None => {
                missing += 1;
                caps[0].to_string()
            }
        })
        .into_owned();
    if missing > 0 {
        warn!("reconstruct: {} placeholder(s) left without translation", missing);
    }

    match options.language.as_deref().map(str::trim) {
        Some(language) if !language.is_empty() => apply_language(&substituted, language, options),
        _ => substituted,
    }
}

fn apply_language(html: &str, language: &str, options: &ReconstructOptions) -> String {
    let mut output = html.to_string();
    if options.set_lang || options.set_direction {
        let direction = direction_for(language);
        let mut touched = false;
        output = rewrite_start_tags(&output, "html", |tag| {
            if touched {
                return false;
            }
            touched = true;
            if options.set_lang {
                tag.set("lang", language);
            }
            if options.set_direction {
                tag.set("dir", direction.as_str());
            }
            true
        });
        if !touched {
            debug!("reconstruct: no <html> tag, skipping lang/dir injection");
        }
    }
    if options.overwrite_og_locale {
        let locale = og_locale(language);
        output = rewrite_start_tags(&output, "meta", |tag| {
            let is_locale = tag
                .get("property")
                .map(|value| value.trim().eq_ignore_ascii_case("og:locale"))
                .unwrap_or(false);
            if is_locale {
                tag.set("content", &locale);
            }
            is_locale
        });
    }
    output
}
