use kuchiki::ElementData;

use super::split::has_content;
use super::tag_name;

pub const ALWAYS_TRANSLATABLE_ATTRIBUTES: &[&str] = &[
    "alt",
    "title",
    "description",
    "placeholder",
    "aria-label",
    "aria-labelledby",
    "aria-describedby",
    "aria-valuetext",
    "accesskey",
    "download",
    "prompt",
    "label",
];

const VALUE_ELEMENTS: &[&str] = &["button", "option"];

const VALUE_INPUT_TYPES: &[&str] = &["button", "submit", "reset"];

pub const META_CONTENT_PREFIXES: &[&str] = &[
    "description",
    "keywords",
    "author",
    "og:title",
    "og:description",
    "og:site_name",
    "twitter:title",
    "twitter:description",
    "application-name",
    "msapplication-tooltip",
];

pub const DATA_ATTRIBUTES: &[&str] = &["data-tooltip", "data-title", "data-label", "data-description"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeRule {
    Always,
    Value,
    MetaContent,
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatableAttribute {
    pub name: String,
    pub value: String,
    pub rule: AttributeRule,
}

/// Attributes of `element` that carry translatable text, in rule precedence
/// order. Each attribute appears at most once.
pub fn translatable_attributes(element: &ElementData) -> Vec<TranslatableAttribute> {
    let tag = tag_name(element);
    let attrs = element.attributes.borrow();
    let mut out: Vec<TranslatableAttribute> = Vec::new();

    let mut push = |name: &str, rule: AttributeRule| {
        if tag == "a" && name == "href" {
            return;
        }
        if out.iter().any(|existing| existing.name == name) {
            return;
        }
        if let Some(value) = attrs.get(name) {
            // A blank alt marks a decorative image; other attributes only need a value.
            let counts = if name == "alt" {
                has_content(value)
            } else {
                !value.is_empty()
            };
            if counts {
                out.push(TranslatableAttribute {
                    name: name.to_string(),
                    value: value.to_string(),
                    rule,
                });
            }
        }
    };

    for name in ALWAYS_TRANSLATABLE_ATTRIBUTES.iter().copied() {
        push(name, AttributeRule::Always);
    }

    if translates_value(tag, attrs.get("type")) {
        push("value", AttributeRule::Value);
    }

    if tag == "meta" && is_translatable_meta(attrs.get("name"), attrs.get("property")) {
        push("content", AttributeRule::MetaContent);
    }

    for name in DATA_ATTRIBUTES.iter().copied() {
        push(name, AttributeRule::Data);
    }

    out
}

pub(crate) fn has_translatable_attribute(element: &ElementData) -> bool {
    !translatable_attributes(element).is_empty()
}

fn translates_value(tag: &str, input_type: Option<&str>) -> bool {
    if VALUE_ELEMENTS.contains(&tag) {
        return true;
    }
    if tag != "input" {
        return false;
    }
    input_type
        .map(|value| {
            let value = value.trim().to_ascii_lowercase();
            VALUE_INPUT_TYPES.contains(&value.as_str())
        })
        .unwrap_or(false)
}

fn is_translatable_meta(name: Option<&str>, property: Option<&str>) -> bool {
    [name, property].into_iter().flatten().any(|key| {
        let key = key.trim().to_ascii_lowercase();
        META_CONTENT_PREFIXES
            .iter()
            .any(|prefix| key.starts_with(prefix))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuchiki::traits::*;

    fn attrs_of(html: &str, selector: &str) -> Vec<(String, AttributeRule)> {
        let document = kuchiki::parse_html().one(html);
        let element = document.select_first(selector).expect("element");
        translatable_attributes(&element)
            .into_iter()
            .map(|attr| (attr.name, attr.rule))
            .collect()
    }

    #[test]
    fn anchor_href_is_never_translated() {
        let found = attrs_of(r#"<a href="/x" title="Go">Go</a>"#, "a");
        assert_eq!(found, vec![("title".to_string(), AttributeRule::Always)]);
    }

    #[test]
    fn blank_alt_is_skipped() {
        assert!(attrs_of(r#"<img alt="  " src="a.png">"#, "img").is_empty());
        assert_eq!(
            attrs_of(r#"<img alt="Logo" src="a.png">"#, "img"),
            vec![("alt".to_string(), AttributeRule::Always)]
        );
    }

    #[test]
    fn only_alt_needs_visible_text() {
        assert_eq!(
            attrs_of(r#"<span title=" " data-label="">x</span>"#, "span"),
            vec![("title".to_string(), AttributeRule::Always)]
        );
    }

    #[test]
    fn value_depends_on_element_and_type() {
        assert_eq!(
            attrs_of(r#"<input type="SUBMIT" value="Send">"#, "input"),
            vec![("value".to_string(), AttributeRule::Value)]
        );
        assert!(attrs_of(r#"<input type="text" value="typed">"#, "input").is_empty());
        assert!(attrs_of(r#"<input value="typed">"#, "input").is_empty());
        assert_eq!(
            attrs_of(r#"<select><option value="Red">Red</option></select>"#, "option"),
            vec![("value".to_string(), AttributeRule::Value)]
        );
    }

    #[test]
    fn meta_content_by_name_or_property() {
        assert_eq!(
            attrs_of(r#"<meta name="Description" content="Site info">"#, "meta"),
            vec![("content".to_string(), AttributeRule::MetaContent)]
        );
        assert_eq!(
            attrs_of(r#"<meta property="og:title" content="Home">"#, "meta"),
            vec![("content".to_string(), AttributeRule::MetaContent)]
        );
        assert!(attrs_of(r#"<meta name="viewport" content="width=device-width">"#, "meta").is_empty());
    }

    #[test]
    fn data_attributes_and_precedence_order() {
        let found = attrs_of(
            r#"<button data-tooltip="Tip" value="Go" title="Title" data-other="x">b</button>"#,
            "button",
        );
        assert_eq!(
            found,
            vec![
                ("title".to_string(), AttributeRule::Always),
                ("value".to_string(), AttributeRule::Value),
                ("data-tooltip".to_string(), AttributeRule::Data),
            ]
        );
    }
}
