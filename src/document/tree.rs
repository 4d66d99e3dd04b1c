//! Composer document: an ordered sequence of inline nodes
//!
//! The document owns its nodes. Adjacent text nodes are merged and empty text
//! nodes dropped after every structural edit, so each text run is maximal.

use super::node::EditorNode;

/// Errors from structural edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// No node at this index
    OutOfBounds(usize),
    /// The node at this index is not a text run
    NotText(usize),
    /// Character span outside the text run
    InvalidSpan { index: usize, start: usize, end: usize },
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::OutOfBounds(i) => write!(f, "No node at index {}", i),
            DocumentError::NotText(i) => write!(f, "Node {} is not a text run", i),
            DocumentError::InvalidSpan { index, start, end } => {
                write!(f, "Span {}..{} is outside text run {}", start, end, index)
            }
        }
    }
}

impl std::error::Error for DocumentError {}

/// Caret location after an edit: node index and character offset within it.
///
/// For non-text nodes, offset 1 means "after the node".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodePosition {
    pub index: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<EditorNode>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<EditorNode>) -> Self {
        let mut doc = Self { nodes };
        doc.normalize();
        doc
    }

    pub fn with_text(text: &str) -> Self {
        Self::from_nodes(vec![EditorNode::text(text)])
    }

    pub fn nodes(&self) -> &[EditorNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<EditorNode> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&EditorNode> {
        self.nodes.get(index)
    }

    /// Content of the text run at `index`
    pub fn text_run(&self, index: usize) -> Result<&str, DocumentError> {
        match self.nodes.get(index) {
            Some(EditorNode::Text(node)) => Ok(&node.content),
            Some(_) => Err(DocumentError::NotText(index)),
            None => Err(DocumentError::OutOfBounds(index)),
        }
    }

    /// Index of the last text run, if any
    pub fn last_text_run(&self) -> Option<usize> {
        self.nodes
            .iter()
            .rposition(|n| matches!(n, EditorNode::Text(_)))
    }

    pub fn push(&mut self, node: EditorNode) {
        self.nodes.push(node);
        self.normalize();
    }

    pub fn insert(&mut self, index: usize, node: EditorNode) -> Result<(), DocumentError> {
        if index > self.nodes.len() {
            return Err(DocumentError::OutOfBounds(index));
        }
        self.nodes.insert(index, node);
        self.normalize();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<EditorNode, DocumentError> {
        if index >= self.nodes.len() {
            return Err(DocumentError::OutOfBounds(index));
        }
        let node = self.nodes.remove(index);
        self.normalize();
        Ok(node)
    }

    /// Copy a node from another document. Nodes are never shared between documents.
    pub fn adopt(&mut self, other: &Document, from: usize, to: usize) -> Result<(), DocumentError> {
        let node = other
            .get(from)
            .cloned()
            .ok_or(DocumentError::OutOfBounds(from))?;
        self.insert(to, node)
    }

    /// Replace characters `start..end` of text run `index` with `replacement`.
    ///
    /// Returns the caret position just after the replacement.
    pub fn replace_span(
        &mut self,
        index: usize,
        start: usize,
        end: usize,
        replacement: EditorNode,
    ) -> Result<NodePosition, DocumentError> {
        let content = self.text_run(index)?;
        let char_len = content.chars().count();
        if start > end || end > char_len {
            return Err(DocumentError::InvalidSpan { index, start, end });
        }

        let before: String = content.chars().take(start).collect();
        let after: String = content.chars().skip(end).collect();
        let before_len = start;

        let mut pieces = Vec::with_capacity(3);
        if !before.is_empty() {
            pieces.push(EditorNode::text(before));
        }

        let caret = match &replacement {
            EditorNode::Text(text) => NodePosition {
                index,
                offset: before_len + text.char_len(),
            },
            _ => {
                let node_index = index + pieces.len();
                if after.is_empty() {
                    NodePosition {
                        index: node_index,
                        offset: 1,
                    }
                } else {
                    NodePosition {
                        index: node_index + 1,
                        offset: 0,
                    }
                }
            }
        };

        pieces.push(replacement);
        if !after.is_empty() {
            pieces.push(EditorNode::text(after));
        }
        self.nodes.splice(index..=index, pieces);
        self.normalize();

        Ok(caret)
    }

    /// Overwrite the content of text run `index`.
    ///
    /// `index == len()` appends a new run after a non-text node (or into an
    /// empty document). Empty content removes the run.
    pub fn set_text(&mut self, index: usize, content: &str) -> Result<(), DocumentError> {
        if index == self.nodes.len() {
            if let Some(EditorNode::Text(_)) = self.nodes.last() {
                return Err(DocumentError::OutOfBounds(index));
            }
            self.push(EditorNode::text(content));
            return Ok(());
        }

        let char_len = self.text_run(index)?.chars().count();
        self.replace_span(index, 0, char_len, EditorNode::text(content))?;
        Ok(())
    }

    /// Markdown for the whole document
    pub fn to_markdown(&self) -> String {
        self.nodes.iter().map(EditorNode::serialize).collect()
    }

    /// Human-readable text
    pub fn plain_text(&self) -> String {
        self.nodes.iter().map(EditorNode::plain_text).collect()
    }

    /// Merge adjacent text runs and drop empty ones
    fn normalize(&mut self) {
        let mut merged: Vec<EditorNode> = Vec::with_capacity(self.nodes.len());
        for node in self.nodes.drain(..) {
            if let EditorNode::Text(text) = &node {
                if text.content.is_empty() {
                    continue;
                }
                if let Some(EditorNode::Text(prev)) = merged.last_mut() {
                    prev.content.push_str(&text.content);
                    continue;
                }
            }
            merged.push(node);
        }
        self.nodes = merged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::{InlineMediaNode, MentionUser};

    fn ada() -> EditorNode {
        EditorNode::mention(MentionUser {
            id: "1".to_string(),
            username: "ada".to_string(),
            display_name: "Ada".to_string(),
            avatar_url: None,
        })
    }

    #[test]
    fn test_from_nodes_merges_text() {
        let doc = Document::from_nodes(vec![
            EditorNode::text("a"),
            EditorNode::text(""),
            EditorNode::text("b"),
            ada(),
            EditorNode::text(""),
        ]);
        assert_eq!(doc.nodes(), &[EditorNode::text("ab"), ada()]);
    }

    #[test]
    fn test_replace_span_with_mention() {
        let mut doc = Document::with_text("hi @ad and bye");
        let caret = doc.replace_span(0, 3, 6, ada()).unwrap();

        assert_eq!(
            doc.nodes(),
            &[EditorNode::text("hi "), ada(), EditorNode::text(" and bye")]
        );
        assert_eq!(caret, NodePosition { index: 2, offset: 0 });
        assert_eq!(doc.to_markdown(), "hi @[Ada](mention:1:ada) and bye");
    }

    #[test]
    fn test_replace_span_at_end() {
        let mut doc = Document::with_text("@ad");
        let caret = doc.replace_span(0, 0, 3, ada()).unwrap();
        assert_eq!(doc.nodes(), &[ada()]);
        assert_eq!(caret, NodePosition { index: 0, offset: 1 });
    }

    #[test]
    fn test_replace_span_with_text_merges() {
        let mut doc = Document::with_text("so :tada: yes");
        let caret = doc.replace_span(0, 3, 9, EditorNode::text("🎉")).unwrap();
        assert_eq!(doc.nodes(), &[EditorNode::text("so 🎉 yes")]);
        assert_eq!(caret, NodePosition { index: 0, offset: 4 });
    }

    #[test]
    fn test_replace_span_errors() {
        let mut doc = Document::from_nodes(vec![ada(), EditorNode::text("abc")]);
        assert_eq!(
            doc.replace_span(0, 0, 1, EditorNode::text("x")),
            Err(DocumentError::NotText(0))
        );
        assert_eq!(
            doc.replace_span(1, 2, 5, EditorNode::text("x")),
            Err(DocumentError::InvalidSpan {
                index: 1,
                start: 2,
                end: 5
            })
        );
        assert_eq!(
            doc.replace_span(7, 0, 0, EditorNode::text("x")),
            Err(DocumentError::OutOfBounds(7))
        );
    }

    #[test]
    fn test_remove_merges_neighbours() {
        let mut doc = Document::from_nodes(vec![
            EditorNode::text("a "),
            ada(),
            EditorNode::text(" b"),
        ]);
        let removed = doc.remove(1).unwrap();
        assert_eq!(removed, ada());
        assert_eq!(doc.nodes(), &[EditorNode::text("a  b")]);
    }

    #[test]
    fn test_adopt_clones() {
        let source = Document::from_nodes(vec![EditorNode::from(InlineMediaNode::image(
            "/a.png", "a",
        ))]);
        let mut target = Document::with_text("x");
        target.adopt(&source, 0, 1).unwrap();

        assert_eq!(target.len(), 2);
        assert_eq!(source.len(), 1);
        assert_eq!(target.get(1), source.get(0));
    }

    #[test]
    fn test_plain_text() {
        let doc = Document::from_nodes(vec![EditorNode::text("hi "), ada()]);
        assert_eq!(doc.plain_text(), "hi @Ada");
    }

    #[test]
    fn test_set_text() {
        let mut doc = Document::new();
        doc.set_text(0, "hi ").unwrap();
        doc.push(ada());
        doc.set_text(2, " there").unwrap();
        assert_eq!(doc.to_markdown(), "hi @[Ada](mention:1:ada) there");

        doc.set_text(0, "hello ").unwrap();
        assert_eq!(doc.text_run(0), Ok("hello "));
        assert_eq!(
            doc.set_text(3, "x"),
            Err(DocumentError::OutOfBounds(3))
        );

        doc.set_text(2, "").unwrap();
        assert_eq!(doc.len(), 2);
    }
}
