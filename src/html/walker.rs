use anyhow::Result;
use kuchiki::NodeRef;
use std::collections::HashSet;
use tracing::{debug, warn};

use super::attributes::translatable_attributes;
use super::chunk::{contains_text, inner_html, is_chunk_candidate};
use super::context::{ContextEntry, EntryKind, selector_path};
use super::exclusion::{ExclusionMatcher, is_inside_raw_text};
use super::placeholder::{PlaceholderTable, TextMap, escape_html};
use super::split::split_text;
use super::{node_key, tag_name};

const STRUCTURED_SCRIPT_TYPES: &[&str] = &["application/json", "application/ld+json"];

enum Visit {
    Enter(NodeRef),
    Leave(NodeRef),
}

/// One extraction pass over a parsed document. Holds the traversal-local
/// processed set; nothing here outlives a single call.
pub(crate) struct Walker<'a> {
    exclusions: &'a ExclusionMatcher,
    table: PlaceholderTable,
    processed: HashSet<usize>,
    context: Option<Vec<ContextEntry>>,
    in_head: bool,
    serialize_chunk: fn(&NodeRef) -> Result<String>,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(exclusions: &'a ExclusionMatcher, capture_context: bool) -> Self {
        Self {
            exclusions,
            table: PlaceholderTable::new(),
            processed: HashSet::new(),
            context: capture_context.then(Vec::new),
            in_head: false,
            serialize_chunk: inner_html,
        }
    }

    pub(crate) fn skip_page_state_scripts(&mut self, document: &NodeRef, ids: &[String]) {
        let Ok(scripts) = document.select("script") else {
            return;
        };
        let scripts: Vec<NodeRef> = scripts.map(|script| script.as_node().clone()).collect();
        for script in scripts {
            if is_page_state_script(&script, ids) {
                debug!("html: skipping page-state script {}", selector_path(&script));
                self.mark_subtree(&script);
            }
        }
    }

    pub(crate) fn walk(&mut self, root: &NodeRef) {
        let mut stack = vec![Visit::Enter(root.clone())];
        while let Some(visit) = stack.pop() {
            let node = match visit {
                Visit::Leave(node) => {
                    self.mark(&node);
                    continue;
                }
                Visit::Enter(node) => node,
            };
            if self.is_processed(&node) {
                continue;
            }
            if node.as_element().is_some() {
                if !self.visit_element(&node) {
                    continue;
                }
            } else if node.as_text().is_some() {
                self.visit_text(&node);
                continue;
            } else if node.first_child().is_none() {
                self.mark(&node);
                continue;
            }
            stack.push(Visit::Leave(node.clone()));
            let children: Vec<NodeRef> = node.children().collect();
            for child in children.into_iter().rev() {
                stack.push(Visit::Enter(child));
            }
        }
    }

    /// `<title>` text and `<meta>` attributes live outside `<body>` and are
    /// handled after the main traversal.
    pub(crate) fn walk_head(&mut self, head: &NodeRef) {
        self.in_head = true;

        for title in select_all(head, "title") {
            if self.is_processed(&title) {
                continue;
            }
            if !self.exclusions.is_excluded(&title) {
                let children: Vec<NodeRef> = title.children().collect();
                for child in children {
                    if child.as_text().is_some() {
                        self.visit_text(&child);
                    }
                }
            }
            self.mark_subtree(&title);
        }

        for meta in select_all(head, "meta") {
            if self.is_processed(&meta) {
                continue;
            }
            if !self.exclusions.is_excluded(&meta) {
                self.extract_attributes(&meta);
            }
            self.mark(&meta);
        }

        self.mark_subtree(head);
        self.in_head = false;
    }

    pub(crate) fn finish(self) -> (TextMap, Option<Vec<ContextEntry>>) {
        (self.table.into_map(), self.context)
    }

    /// Returns true when the element's children still need visiting.
    fn visit_element(&mut self, node: &NodeRef) -> bool {
        if self.exclusions.is_excluded(node) {
            self.mark_subtree(node);
            return false;
        }
        if is_chunk_candidate(node, self.exclusions)
            && contains_text(node)
            && self.extract_chunk(node)
        {
            return false;
        }
        self.extract_attributes(node);
        true
    }

    fn visit_text(&mut self, node: &NodeRef) {
        let parent_done = node
            .parent()
            .map(|parent| self.is_processed(&parent))
            .unwrap_or(false);
        if parent_done || is_inside_raw_text(node) {
            self.mark(node);
            return;
        }
        let Some(text) = node.as_text() else {
            return;
        };
        let original = text.borrow().clone();
        if let Some(split) = split_text(&original) {
            let placeholder = self.table.register(&escape_html(split.middle));
            *text.borrow_mut() = format!("{}{}{}", split.leading, placeholder, split.trailing);
            self.record(&placeholder, split.middle, node, None, EntryKind::Text);
        }
        self.mark(node);
    }

    fn extract_chunk(&mut self, node: &NodeRef) -> bool {
        let html = match (self.serialize_chunk)(node) {
            Ok(html) => html,
            Err(err) => {
                warn!(
                    "html: leaving {} unchunked: {:#}",
                    selector_path(node),
                    err
                );
                return false;
            }
        };
        // Attributes of the element itself sit outside the chunk.
        self.extract_attributes(node);
        let placeholder = self.table.register(&html);
        let children: Vec<NodeRef> = node.children().collect();
        for child in children {
            child.detach();
        }
        node.append(NodeRef::new_text(placeholder.clone()));
        self.record(&placeholder, &html, node, None, EntryKind::Chunk);
        self.mark_subtree(node);
        true
    }

    fn extract_attributes(&mut self, node: &NodeRef) {
        let Some(element) = node.as_element() else {
            return;
        };
        for attr in translatable_attributes(element) {
            let placeholder = self.table.register(&escape_html(&attr.value));
            element
                .attributes
                .borrow_mut()
                .insert(attr.name.as_str(), placeholder.clone());
            self.record(
                &placeholder,
                &attr.value,
                node,
                Some(attr.name),
                EntryKind::Attribute,
            );
        }
    }

    fn record(
        &mut self,
        placeholder: &str,
        text: &str,
        node: &NodeRef,
        attribute: Option<String>,
        kind: EntryKind,
    ) {
        let in_head = self.in_head;
        let Some(context) = self.context.as_mut() else {
            return;
        };
        context.push(ContextEntry {
            placeholder: placeholder.to_string(),
            text: text.to_string(),
            selector: selector_path(node),
            attribute,
            kind,
            in_head,
        });
    }

    fn mark(&mut self, node: &NodeRef) {
        self.processed.insert(node_key(node));
    }

    fn mark_subtree(&mut self, node: &NodeRef) {
        for descendant in node.inclusive_descendants() {
            self.processed.insert(node_key(&descendant));
        }
    }

    fn is_processed(&self, node: &NodeRef) -> bool {
        self.processed.contains(&node_key(node))
    }
}

fn is_page_state_script(node: &NodeRef, ids: &[String]) -> bool {
    let Some(element) = node.as_element() else {
        return false;
    };
    if tag_name(element) != "script" {
        return false;
    }
    let attrs = element.attributes.borrow();
    if let Some(id) = attrs.get("id") {
        if ids.iter().any(|known| known == id.trim()) {
            return true;
        }
    }
    attrs
        .get("type")
        .map(|value| {
            let value = value.trim().to_ascii_lowercase();
            STRUCTURED_SCRIPT_TYPES.contains(&value.as_str())
        })
        .unwrap_or(false)
}

fn select_all(root: &NodeRef, selector: &str) -> Vec<NodeRef> {
    match root.select(selector) {
        Ok(found) => found.map(|element| element.as_node().clone()).collect(),
        Err(()) => Vec::new(),
    }
}
