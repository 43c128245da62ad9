use kuchiki::{NodeRef, Selectors};
use tracing::warn;

use super::tag_name;

pub const BUILTIN_EXCLUDED_SELECTORS: &[&str] =
    &[".no-translate", "script", "style", "code", "pre", "noscript"];

/// Elements whose text is raw code or markup; text below them is never hashed.
pub(crate) const RAW_TEXT_ELEMENTS: &[&str] = &["code", "pre", "script", "style", "noscript"];

pub struct ExclusionMatcher {
    selectors: Vec<Selectors>,
}

impl ExclusionMatcher {
    /// Compiles the project selectors plus the built-in list. A selector that
    /// does not compile is logged and dropped, so it never matches.
    pub fn new<S: AsRef<str>>(excluded_selectors: &[S]) -> Self {
        let mut selectors = Vec::new();
        let candidates = BUILTIN_EXCLUDED_SELECTORS
            .iter()
            .copied()
            .chain(excluded_selectors.iter().map(AsRef::as_ref));
        for raw in candidates {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            match Selectors::compile(raw) {
                Ok(compiled) => selectors.push(compiled),
                Err(()) => warn!("exclusion: ignoring malformed selector '{}'", raw),
            }
        }
        Self { selectors }
    }

    pub fn is_excluded(&self, node: &NodeRef) -> bool {
        let element = if node.as_element().is_some() {
            node.clone()
        } else {
            match node.parent() {
                Some(parent) if parent.as_element().is_some() => parent,
                _ => return false,
            }
        };
        let Some(element) = element.into_element_ref() else {
            return false;
        };
        self.selectors
            .iter()
            .any(|selectors| selectors.matches(&element))
    }

    pub(crate) fn has_excluded_descendant(&self, node: &NodeRef) -> bool {
        node.descendants()
            .filter(|descendant| descendant.as_element().is_some())
            .any(|descendant| self.is_excluded(&descendant))
    }
}

pub(crate) fn is_raw_text_element(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&name)
}

pub(crate) fn is_inside_raw_text(node: &NodeRef) -> bool {
    node.ancestors().any(|ancestor| {
        ancestor
            .as_element()
            .map(|element| is_raw_text_element(tag_name(element)))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuchiki::traits::*;

    fn first(document: &NodeRef, selector: &str) -> NodeRef {
        document
            .select_first(selector)
            .expect("element")
            .as_node()
            .clone()
    }

    #[test]
    fn builtin_selectors_match() {
        let document = kuchiki::parse_html()
            .one(r#"<p class="no-translate">x</p><pre>y</pre><p id="ok">z</p>"#);
        let matcher = ExclusionMatcher::new::<&str>(&[]);
        assert!(matcher.is_excluded(&first(&document, "p.no-translate")));
        assert!(matcher.is_excluded(&first(&document, "pre")));
        assert!(!matcher.is_excluded(&first(&document, "#ok")));
    }

    #[test]
    fn text_node_uses_parent_element() {
        let document = kuchiki::parse_html().one(r#"<nav>Menu</nav><p>Body</p>"#);
        let matcher = ExclusionMatcher::new(&["nav"]);
        let nav_text = first(&document, "nav").first_child().expect("text");
        let p_text = first(&document, "p").first_child().expect("text");
        assert!(matcher.is_excluded(&nav_text));
        assert!(!matcher.is_excluded(&p_text));
    }

    #[test]
    fn malformed_selector_never_matches() {
        let document = kuchiki::parse_html().one(r#"<div class="a">x</div>"#);
        let matcher = ExclusionMatcher::new(&["div[", "", "  "]);
        assert!(!matcher.is_excluded(&first(&document, "div")));
    }

    #[test]
    fn raw_text_ancestry() {
        let document = kuchiki::parse_html().one("<pre><span>code</span></pre>");
        let text = first(&document, "span").first_child().expect("text");
        assert!(is_inside_raw_text(&text));
    }
}
