mod attributes;
mod chunk;
mod context;
mod exclusion;
mod parser;
mod placeholder;
mod reconstruct;
mod split;
mod tag_edit;
mod walker;

use anyhow::{Context, Result};
use kuchiki::{ElementData, NodeRef};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::{debug, info};

pub use attributes::{
    ALWAYS_TRANSLATABLE_ATTRIBUTES, AttributeRule, DATA_ATTRIBUTES, META_CONTENT_PREFIXES,
    TranslatableAttribute, translatable_attributes,
};
pub use chunk::{INLINE_ELEMENTS, has_translatable_content, is_chunk_candidate};
pub use context::{ContextEntry, EntryKind, selector_path};
pub use exclusion::{BUILTIN_EXCLUDED_SELECTORS, ExclusionMatcher};
pub use parser::{DocumentKind, Html5everParser, HtmlParser, decode_html};
pub use placeholder::{
    PlaceholderTable, TextMap, is_placeholder, missing_placeholders, placeholder_for,
};
pub use reconstruct::{ReconstructOptions, reconstruct_html};
pub use split::{SplitText, split_text};

use walker::Walker;

pub const DEFAULT_PAGE_STATE_SCRIPT_IDS: &[&str] =
    &["__NEXT_DATA__", "__NUXT_DATA__", "__NUXT__", "__APOLLO_STATE__"];

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub excluded_selectors: Vec<String>,
    pub capture_context: bool,
    pub page_state_script_ids: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            excluded_selectors: Vec::new(),
            capture_context: false,
            page_state_script_ids: DEFAULT_PAGE_STATE_SCRIPT_IDS
                .iter()
                .map(|id| id.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub modified_html: String,
    pub text_map: TextMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strings_with_context: Option<Vec<ContextEntry>>,
}

pub struct HtmlExtractor<P = Html5everParser> {
    parser: P,
    options: ExtractOptions,
    exclusions: ExclusionMatcher,
}

impl HtmlExtractor<Html5everParser> {
    pub fn new(options: ExtractOptions) -> Self {
        Self::with_parser(Html5everParser, options)
    }
}

impl<P: HtmlParser> HtmlExtractor<P> {
    pub fn with_parser(parser: P, options: ExtractOptions) -> Self {
        let exclusions = ExclusionMatcher::new(&options.excluded_selectors);
        Self {
            parser,
            options,
            exclusions,
        }
    }

    pub fn extract(&self, html: &str) -> Result<ExtractionResult> {
        let kind = DocumentKind::detect(html);
        debug!("html: parsing {} bytes as {:?}", html.len(), kind);
        let document = self
            .parser
            .parse(html)
            .with_context(|| "failed to build html document")?;

        let mut walker = Walker::new(&self.exclusions, self.options.capture_context);
        walker.skip_page_state_scripts(&document, &self.options.page_state_script_ids);
        match document.select_first("body") {
            Ok(body) => walker.walk(body.as_node()),
            Err(()) => walker.walk(&document),
        }
        if let Ok(head) = document.select_first("head") {
            walker.walk_head(head.as_node());
        }
        let (text_map, strings_with_context) = walker.finish();

        let modified_html = serialize_document(&document, kind)?;
        info!("html: extracted {} translatable strings", text_map.len());
        Ok(ExtractionResult {
            modified_html,
            text_map,
            strings_with_context,
        })
    }
}

pub fn extract_html(html: &str, options: &ExtractOptions) -> Result<ExtractionResult> {
    HtmlExtractor::new(options.clone()).extract(html)
}

fn serialize_document(document: &NodeRef, kind: DocumentKind) -> Result<String> {
    match kind {
        DocumentKind::Document => {
            let mut buffer = Vec::new();
            document
                .serialize(&mut buffer)
                .with_context(|| "failed to serialize html document")?;
            String::from_utf8(buffer).with_context(|| "serialized html is not UTF-8")
        }
        DocumentKind::Fragment => {
            let mut buffer = Vec::new();
            serialize_unwrapped(document, &mut buffer)?;
            String::from_utf8(buffer).with_context(|| "serialized html is not UTF-8")
        }
    }
}

/// Writes the children of `node` in order, descending through the
/// `<html>`/`<head>`/`<body>` the parser synthesized around a fragment.
fn serialize_unwrapped(node: &NodeRef, buffer: &mut Vec<u8>) -> Result<()> {
    for child in node.children() {
        let synthesized = child
            .as_element()
            .map(|element| matches!(tag_name(element), "html" | "head" | "body"))
            .unwrap_or(false);
        if synthesized {
            serialize_unwrapped(&child, buffer)?;
        } else {
            child
                .serialize(buffer)
                .with_context(|| "failed to serialize html fragment")?;
        }
    }
    Ok(())
}

pub(crate) fn node_key(node: &NodeRef) -> usize {
    Rc::as_ptr(&node.0) as usize
}

pub(crate) fn tag_name(element: &ElementData) -> &str {
    &element.name.local
}
