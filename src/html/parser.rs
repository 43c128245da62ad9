use anyhow::{Context, Result};
use kuchiki::NodeRef;
use once_cell::sync::Lazy;
use regex::Regex;

static DOCUMENT_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(?:!doctype|html|head|body)[\s/>]").expect("Invalid document tag regex")
});

/// Builds a DOM for the extractor. Injected so callers can swap the parser
/// without touching process-wide state.
pub trait HtmlParser {
    fn parse(&self, html: &str) -> Result<NodeRef>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Html5everParser;

impl HtmlParser for Html5everParser {
    fn parse(&self, html: &str) -> Result<NodeRef> {
        use kuchiki::traits::*;

        Ok(kuchiki::parse_html().one(html))
    }
}

pub fn decode_html(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).with_context(|| "failed to decode html as UTF-8")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Document,
    Fragment,
}

impl DocumentKind {
    /// Input naming no document-level tag is treated as a fragment and is
    /// serialized back without the synthesized `<html>`/`<head>`/`<body>`.
    pub fn detect(html: &str) -> Self {
        if DOCUMENT_TAG_REGEX.is_match(html) {
            DocumentKind::Document
        } else {
            DocumentKind::Fragment
        }
    }
}
