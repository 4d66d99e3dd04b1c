//! Ordered transformer pipeline
//!
//! Import scans left to right, taking the earliest match of any transformer.
//! When two transformers match at the same position the one registered first
//! wins, so custom nodes are registered before generic images. Text between
//! matches becomes text nodes. A match that fails to import is kept as literal
//! text.

use std::sync::Arc;

use regex::Captures;

use super::transformer::{EmojiTransformer, ImageTransformer, MentionTransformer, Transformer};
use crate::document::{Document, EditorNode};
use crate::emoji::EmojiResolver;

/// Result of a shortcut match while typing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    /// Character offset where the matched Markdown begins
    pub start: usize,
    /// Character offset of the caret
    pub end: usize,
    pub node: EditorNode,
}

pub struct Pipeline {
    transformers: Vec<Box<dyn Transformer>>,
}

impl Pipeline {
    /// Mention, then emoji, then generic image
    pub fn new(resolver: Arc<dyn EmojiResolver>) -> Self {
        Self::with_transformers(vec![
            Box::new(MentionTransformer::new()),
            Box::new(EmojiTransformer::new(resolver)),
            Box::new(ImageTransformer::new()),
        ])
    }

    /// Transformers are tried in the given order
    pub fn with_transformers(transformers: Vec<Box<dyn Transformer>>) -> Self {
        Self { transformers }
    }

    pub fn transformer_names(&self) -> Vec<&'static str> {
        self.transformers.iter().map(|t| t.name()).collect()
    }

    /// Parse Markdown into inline nodes
    pub fn import(&self, markdown: &str) -> Vec<EditorNode> {
        let mut nodes = Vec::new();
        let mut text = String::new();
        let mut pos = 0;

        while pos < markdown.len() {
            let Some((start, end, transformer, captures)) = self.earliest_match(markdown, pos)
            else {
                break;
            };

            text.push_str(&markdown[pos..start]);
            match transformer.import(&captures) {
                Ok(node) => {
                    if !text.is_empty() {
                        nodes.push(EditorNode::text(std::mem::take(&mut text)));
                    }
                    nodes.push(node);
                }
                Err(e) => {
                    tracing::debug!(
                        "{} transformer kept {:?} as text: {}",
                        transformer.name(),
                        &markdown[start..end],
                        e
                    );
                    text.push_str(&markdown[start..end]);
                }
            }
            pos = end;
        }

        text.push_str(&markdown[pos..]);
        if !text.is_empty() {
            nodes.push(EditorNode::text(text));
        }
        nodes
    }

    pub fn import_document(&self, markdown: &str) -> Document {
        Document::from_nodes(self.import(markdown))
    }

    /// Serialize nodes to Markdown
    pub fn export(&self, nodes: &[EditorNode]) -> String {
        let mut out = String::new();
        for node in nodes {
            let exported = self.transformers.iter().find_map(|t| t.export(node));
            match (exported, node) {
                (Some(markdown), _) => out.push_str(&markdown),
                (None, EditorNode::Text(text)) => out.push_str(&text.content),
                (None, other) => {
                    tracing::warn!("No transformer exports {} nodes", other.kind_name());
                    out.push_str(&other.serialize());
                }
            }
        }
        out
    }

    pub fn export_document(&self, document: &Document) -> String {
        self.export(document.nodes())
    }

    /// Check whether typing just completed a construct at the caret.
    ///
    /// Only fires when the character before the caret is a transformer's
    /// trigger. Fragments that fail to import are left alone.
    pub fn shortcut(&self, run: &str, caret: usize) -> Option<Shortcut> {
        let before: String = run.chars().take(caret).collect();
        let last = before.chars().last()?;
        let caret = before.chars().count();

        for transformer in self.transformers.iter().filter(|t| t.trigger() == last) {
            let Some(captures) = transformer.shortcut_pattern().captures(&before) else {
                continue;
            };
            let Some(whole) = captures.get(0) else {
                continue;
            };

            return match transformer.import(&captures) {
                Ok(node) => Some(Shortcut {
                    start: before[..whole.start()].chars().count(),
                    end: caret,
                    node,
                }),
                Err(e) => {
                    tracing::debug!("{} shortcut not applied: {}", transformer.name(), e);
                    None
                }
            };
        }
        None
    }

    fn earliest_match<'t>(
        &self,
        haystack: &'t str,
        pos: usize,
    ) -> Option<(usize, usize, &dyn Transformer, Captures<'t>)> {
        let mut best: Option<(usize, usize, &dyn Transformer, Captures<'t>)> = None;
        for transformer in &self.transformers {
            let Some(captures) = transformer.pattern().captures_at(haystack, pos) else {
                continue;
            };
            let Some(whole) = captures.get(0) else {
                continue;
            };
            if best.as_ref().map_or(true, |(start, ..)| whole.start() < *start) {
                best = Some((whole.start(), whole.end(), transformer.as_ref(), captures));
            }
        }
        best
    }
}
