use anyhow::{Context, Result};
use kuchiki::NodeRef;

use super::attributes::has_translatable_attribute;
use super::exclusion::ExclusionMatcher;
use super::split::has_content;
use super::tag_name;

pub const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "del", "dfn", "em", "font",
    "i", "img", "ins", "kbd", "label", "mark", "q", "s", "samp", "small", "span", "strike",
    "strong", "sub", "sup", "time", "tt", "u", "var", "wbr",
];

pub(crate) fn is_inline_element(name: &str) -> bool {
    INLINE_ELEMENTS.contains(&name)
}

/// An element has translatable content when one of its classifiable
/// attributes is filled or a direct text child is not blank.
pub fn has_translatable_content(node: &NodeRef) -> bool {
    let Some(element) = node.as_element() else {
        return false;
    };
    if has_translatable_attribute(element) {
        return true;
    }
    node.children().any(|child| is_filled_text(&child))
}

/// Whether `node`'s inner HTML should travel as a single opaque chunk.
pub fn is_chunk_candidate(node: &NodeRef, exclusions: &ExclusionMatcher) -> bool {
    let Some(element) = node.as_element() else {
        return false;
    };
    if tag_name(element) == "img" || exclusions.is_excluded(node) {
        return false;
    }

    let mut has_element_child = false;
    let mut carries_content = false;
    for child in node.children() {
        if child.as_text().is_some() {
            carries_content |= is_filled_text(&child);
            continue;
        }
        let Some(child_element) = child.as_element() else {
            continue;
        };
        has_element_child = true;
        let child_tag = tag_name(child_element);
        if child_tag == "a" || !is_inline_element(child_tag) {
            return false;
        }
        if !carries_content {
            carries_content = child
                .inclusive_descendants()
                .any(|descendant| has_translatable_content(&descendant));
        }
    }

    if !has_element_child || !carries_content {
        return false;
    }
    // Excluded markup must never reach the translator, even inside a chunk.
    !exclusions.has_excluded_descendant(node)
}

pub(crate) fn contains_text(node: &NodeRef) -> bool {
    has_content(&node.text_contents())
}

pub(crate) fn inner_html(node: &NodeRef) -> Result<String> {
    let mut buffer = Vec::new();
    for child in node.children() {
        child
            .serialize(&mut buffer)
            .with_context(|| "failed to serialize child node")?;
    }
    String::from_utf8(buffer).with_context(|| "serialized html is not UTF-8")
}

fn is_filled_text(node: &NodeRef) -> bool {
    node.as_text()
        .map(|text| has_content(&text.borrow()))
        .unwrap_or(false)
}
