use kuchiki::NodeRef;
use serde::{Deserialize, Serialize};

use super::{node_key, tag_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Text,
    Chunk,
    Attribute,
}

/// Where an extracted string came from. Diagnostics only; reconstruction
/// never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextEntry {
    pub placeholder: String,
    pub text: String,
    pub selector: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    pub kind: EntryKind,
    pub in_head: bool,
}

/// CSS-like path from the document root to `node` (or its parent element for
/// text nodes). Stops early at an element carrying an `id`.
pub fn selector_path(node: &NodeRef) -> String {
    let mut segments = Vec::new();
    let start = if node.as_element().is_some() {
        Some(node.clone())
    } else {
        node.parent()
    };
    let mut current = start;
    while let Some(element_node) = current {
        let Some(element) = element_node.as_element() else {
            break;
        };
        let tag = tag_name(element).to_string();
        let attrs = element.attributes.borrow();
        if let Some(id) = attrs.get("id").map(str::trim).filter(|id| !id.is_empty()) {
            segments.push(format!("{}#{}", tag, id));
            break;
        }
        let mut segment = tag.clone();
        if let Some(class) = attrs.get("class") {
            for name in class.split_whitespace() {
                segment.push('.');
                segment.push_str(name);
            }
        }
        if let Some(position) = nth_of_type(&element_node, &tag) {
            segment.push_str(&format!(":nth-of-type({})", position));
        }
        segments.push(segment);
        current = element_node.parent();
    }
    segments.reverse();
    segments.join(" > ")
}

fn nth_of_type(node: &NodeRef, tag: &str) -> Option<usize> {
    let parent = node.parent()?;
    let mut position = 0usize;
    let mut count = 0usize;
    for sibling in parent.children() {
        let Some(element) = sibling.as_element() else {
            continue;
        };
        if tag_name(element) != tag {
            continue;
        }
        count += 1;
        if node_key(&sibling) == node_key(node) {
            position = count;
        }
    }
    if count > 1 { Some(position) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuchiki::traits::*;

    #[test]
    fn path_stops_at_id() {
        let document = kuchiki::parse_html()
            .one(r#"<div id="main"><p class="lead intro">Hi</p></div>"#);
        let p = document.select_first("p").expect("p").as_node().clone();
        assert_eq!(selector_path(&p), "div#main > p.lead.intro");
        let text = p.first_child().expect("text");
        assert_eq!(selector_path(&text), "div#main > p.lead.intro");
    }

    #[test]
    fn path_disambiguates_siblings() {
        let document = kuchiki::parse_html().one("<ul><li>a</li><li>b</li></ul>");
        let second = document
            .select("li")
            .expect("select")
            .nth(1)
            .expect("second li")
            .as_node()
            .clone();
        assert_eq!(
            selector_path(&second),
            "html > body > ul > li:nth-of-type(2)"
        );
    }
}
