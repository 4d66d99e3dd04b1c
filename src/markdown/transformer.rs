//! Markdown transformers for custom inline nodes
//!
//! Each transformer pairs an export (node → Markdown) with an import
//! (pattern match → node). Import patterns come in two forms: unanchored for
//! whole-string import, and anchored at the end for incremental typing, where
//! the closing `)` finalizes the match.

use std::sync::Arc;

use regex::{Captures, Regex};

use crate::document::{unescape_field, EditorNode, InlineMediaNode, MentionNode, MentionUser};
use crate::emoji::EmojiResolver;

// Fields accept backslash escapes; see `document::node` for what gets escaped
const MENTION_PATTERN: &str =
    r"(?s)@\[((?:\\.|[^\]\\])*)\]\(mention:((?:\\.|[^:)\s\\])*):((?:\\.|[^:)\s\\])*)(?::((?:\\.|[^)\s\\])*))?\)";
const EMOJI_PATTERN: &str =
    r"(?s)!\[(emoji:(?:\\.|[^\]\\])*)\]\(((?:\\.|[^)\s\\])*)(?:\s+=(\d*)x(\d*))?\)";
const IMAGE_PATTERN: &str =
    r"(?s)!\[((?:\\.|[^\]\\])*)\]\(((?:\\.|[^)\s\\])*)(?:\s+=(\d*)x(\d*))?\)";

/// Errors from importing a syntactically valid fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// Bare emoji id that the resolver does not know
    UnresolvedEmoji(String),
    /// Size suffix that does not fit in a pixel dimension
    InvalidSize(String),
}

impl std::fmt::Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformError::UnresolvedEmoji(id) => write!(f, "Unresolved emoji: {}", id),
            TransformError::InvalidSize(s) => write!(f, "Invalid image size: {}", s),
        }
    }
}

impl std::error::Error for TransformError {}

/// A matched export/import pair for one Markdown construct
pub trait Transformer {
    fn name(&self) -> &'static str;

    /// Pattern located anywhere in the input
    fn pattern(&self) -> &Regex;

    /// Same pattern anchored at the end of the input
    fn shortcut_pattern(&self) -> &Regex;

    /// Character whose insertion can complete a shortcut match
    fn trigger(&self) -> char {
        ')'
    }

    /// Markdown for `node`, or `None` if this transformer does not handle it
    fn export(&self, node: &EditorNode) -> Option<String>;

    fn import(&self, captures: &Captures<'_>) -> Result<EditorNode, TransformError>;
}

fn compile(pattern: &str) -> (Regex, Regex) {
    let unanchored = Regex::new(pattern).expect("transformer pattern is valid");
    let anchored = Regex::new(&format!("(?:{})$", pattern)).expect("transformer pattern is valid");
    (unanchored, anchored)
}

/// Unescaped value of a capture group, empty when it did not participate
fn group(captures: &Captures<'_>, index: usize) -> String {
    captures
        .get(index)
        .map_or_else(String::new, |m| unescape_field(m.as_str()))
}

/// Values with no URL scheme and no leading slash are ids, not locations
pub fn is_bare_reference(value: &str) -> bool {
    !value.starts_with('/') && !has_url_scheme(value)
}

fn has_url_scheme(value: &str) -> bool {
    if value.starts_with("data:") || value.starts_with("blob:") {
        return true;
    }
    match value.split_once("://") {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

fn parse_size(captures: &Captures<'_>) -> Result<(Option<u32>, Option<u32>), TransformError> {
    let parse = |index: usize| -> Result<Option<u32>, TransformError> {
        match captures.get(index).map(|m| m.as_str()) {
            None | Some("") => Ok(None),
            Some(digits) => digits
                .parse()
                .map(Some)
                .map_err(|_| TransformError::InvalidSize(digits.to_string())),
        }
    };
    Ok((parse(3)?, parse(4)?))
}

// ============================================================================
// Mention
// ============================================================================

pub struct MentionTransformer {
    pattern: Regex,
    shortcut: Regex,
}

impl MentionTransformer {
    pub fn new() -> Self {
        let (pattern, shortcut) = compile(MENTION_PATTERN);
        Self { pattern, shortcut }
    }
}

impl Default for MentionTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for MentionTransformer {
    fn name(&self) -> &'static str {
        "mention"
    }

    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn shortcut_pattern(&self) -> &Regex {
        &self.shortcut
    }

    fn export(&self, node: &EditorNode) -> Option<String> {
        match node {
            EditorNode::Mention(mention) => Some(mention.serialize()),
            _ => None,
        }
    }

    fn import(&self, captures: &Captures<'_>) -> Result<EditorNode, TransformError> {
        Ok(EditorNode::Mention(MentionNode::new(MentionUser {
            display_name: group(captures, 1),
            id: group(captures, 2),
            username: group(captures, 3),
            avatar_url: captures.get(4).map(|m| unescape_field(m.as_str())),
        })))
    }
}

// ============================================================================
// Inline emoji
// ============================================================================

/// `![emoji:name](idOrUrl)`; bare ids go through the resolver
pub struct EmojiTransformer {
    pattern: Regex,
    shortcut: Regex,
    resolver: Arc<dyn EmojiResolver>,
}

impl EmojiTransformer {
    pub fn new(resolver: Arc<dyn EmojiResolver>) -> Self {
        let (pattern, shortcut) = compile(EMOJI_PATTERN);
        Self {
            pattern,
            shortcut,
            resolver,
        }
    }
}

impl Transformer for EmojiTransformer {
    fn name(&self) -> &'static str {
        "emoji"
    }

    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn shortcut_pattern(&self) -> &Regex {
        &self.shortcut
    }

    fn export(&self, node: &EditorNode) -> Option<String> {
        match node {
            EditorNode::InlineMedia(media) if media.is_emoji() => Some(media.serialize()),
            _ => None,
        }
    }

    fn import(&self, captures: &Captures<'_>) -> Result<EditorNode, TransformError> {
        let alt = group(captures, 1);
        let value = group(captures, 2);
        let (width, height) = parse_size(captures)?;

        let node = if is_bare_reference(&value) {
            let resolved = self
                .resolver
                .resolve(&value)
                .ok_or(TransformError::UnresolvedEmoji(value))?;
            InlineMediaNode::image(resolved.src, alt).with_id(resolved.id)
        } else {
            InlineMediaNode::image(value, alt)
        };

        Ok(EditorNode::InlineMedia(node.with_size(width, height)))
    }
}

// ============================================================================
// Generic inline image
// ============================================================================

/// `![alt](idOrSrc)` for anything that is not an emoji
pub struct ImageTransformer {
    pattern: Regex,
    shortcut: Regex,
}

impl ImageTransformer {
    pub fn new() -> Self {
        let (pattern, shortcut) = compile(IMAGE_PATTERN);
        Self { pattern, shortcut }
    }
}

impl Default for ImageTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for ImageTransformer {
    fn name(&self) -> &'static str {
        "image"
    }

    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn shortcut_pattern(&self) -> &Regex {
        &self.shortcut
    }

    fn export(&self, node: &EditorNode) -> Option<String> {
        match node {
            EditorNode::InlineMedia(media) if !media.is_emoji() => Some(media.serialize()),
            _ => None,
        }
    }

    fn import(&self, captures: &Captures<'_>) -> Result<EditorNode, TransformError> {
        let alt = group(captures, 1);
        let value = group(captures, 2);
        let (width, height) = parse_size(captures)?;

        let id = is_bare_reference(&value).then(|| value.clone());
        let mut node = InlineMediaNode::image(value, alt);
        if let Some(id) = id {
            node = node.with_id(id);
        }
        Ok(EditorNode::InlineMedia(node.with_size(width, height)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emoji::ResolvedEmoji;

    fn import(transformer: &dyn Transformer, input: &str) -> Result<EditorNode, TransformError> {
        let captures = transformer
            .pattern()
            .captures(input)
            .expect("pattern should match");
        transformer.import(&captures)
    }

    fn resolver() -> Arc<dyn EmojiResolver> {
        Arc::new(|id: &str| {
            (id == "devhub:party_parrot").then(|| ResolvedEmoji {
                id: id.to_string(),
                src: "https://cdn.example/parrot.gif".to_string(),
            })
        })
    }

    #[test]
    fn test_bare_reference() {
        assert!(is_bare_reference("devhub:party_parrot"));
        assert!(is_bare_reference("media_9"));
        assert!(!is_bare_reference("/uploads/a.png"));
        assert!(!is_bare_reference("https://cdn.example/a.png"));
        assert!(!is_bare_reference("blob:https://app/1"));
        assert!(!is_bare_reference("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_mention_import() {
        let node = import(
            &MentionTransformer::new(),
            "hey @[Ada L](mention:42:ada:https://img.example/a.png) hi",
        )
        .unwrap();
        let EditorNode::Mention(mention) = node else {
            panic!("expected mention");
        };
        assert_eq!(mention.user.display_name, "Ada L");
        assert_eq!(mention.user.id, "42");
        assert_eq!(mention.user.username, "ada");
        assert_eq!(
            mention.user.avatar_url.as_deref(),
            Some("https://img.example/a.png")
        );
    }

    #[test]
    fn test_mention_shortcut_requires_closing_paren_at_end() {
        let t = MentionTransformer::new();
        assert!(t.shortcut_pattern().is_match("x @[Ada](mention:42:ada)"));
        assert!(!t.shortcut_pattern().is_match("x @[Ada](mention:42:ada"));
        assert!(!t.shortcut_pattern().is_match("@[Ada](mention:42:ada) "));
    }

    #[test]
    fn test_emoji_import_resolves_bare_id() {
        let t = EmojiTransformer::new(resolver());
        let node = import(&t, "![emoji:party_parrot](devhub:party_parrot)").unwrap();
        let EditorNode::InlineMedia(media) = node else {
            panic!("expected media");
        };
        assert_eq!(media.id.as_deref(), Some("devhub:party_parrot"));
        assert_eq!(media.src, "https://cdn.example/parrot.gif");
    }

    #[test]
    fn test_emoji_import_literal_url() {
        let t = EmojiTransformer::new(resolver());
        let node = import(&t, "![emoji:x](https://cdn.example/x.png)").unwrap();
        let EditorNode::InlineMedia(media) = node else {
            panic!("expected media");
        };
        assert_eq!(media.id, None);
        assert_eq!(media.src, "https://cdn.example/x.png");
    }

    #[test]
    fn test_emoji_unresolved() {
        let t = EmojiTransformer::new(resolver());
        assert_eq!(
            import(&t, "![emoji:nope](nope)"),
            Err(TransformError::UnresolvedEmoji("nope".to_string()))
        );
    }

    #[test]
    fn test_mention_import_unescapes_fields() {
        let node = import(
            &MentionTransformer::new(),
            r"@[Bob [Admin\]](mention:team\:42:bob:https://img.example/a_(1\).png)",
        )
        .unwrap();
        let EditorNode::Mention(mention) = node else {
            panic!("expected mention");
        };
        assert_eq!(mention.user.display_name, "Bob [Admin]");
        assert_eq!(mention.user.id, "team:42");
        assert_eq!(mention.user.username, "bob");
        assert_eq!(
            mention.user.avatar_url.as_deref(),
            Some("https://img.example/a_(1).png")
        );
    }

    #[test]
    fn test_image_import_unescapes_fields() {
        let node = import(&ImageTransformer::new(), r"![see [1\]](/my\ pics/a\).png =2x)").unwrap();
        let EditorNode::InlineMedia(media) = node else {
            panic!("expected media");
        };
        assert_eq!(media.alt, "see [1]");
        assert_eq!(media.src, "/my pics/a).png");
        assert_eq!(media.width, Some(2));
    }

    #[test]
    fn test_unescaped_delimiter_ends_field() {
        let t = ImageTransformer::new();
        let captures = t.pattern().captures("![a](/b).png)").unwrap();
        assert_eq!(captures.get(0).map(|m| m.as_str()), Some("![a](/b)"));
    }

    #[test]
    fn test_emoji_pattern_ignores_plain_images() {
        let t = EmojiTransformer::new(resolver());
        assert!(!t.pattern().is_match("![cat](/cat.png)"));
    }

    #[test]
    fn test_image_import_with_size() {
        let node = import(&ImageTransformer::new(), "![cat](/cat.png =320x)").unwrap();
        let EditorNode::InlineMedia(media) = node else {
            panic!("expected media");
        };
        assert_eq!(media.src, "/cat.png");
        assert_eq!(media.id, None);
        assert_eq!(media.width, Some(320));
        assert_eq!(media.height, None);
    }

    #[test]
    fn test_image_bare_value_is_id() {
        let node = import(&ImageTransformer::new(), "![cat](media_9)").unwrap();
        let EditorNode::InlineMedia(media) = node else {
            panic!("expected media");
        };
        assert_eq!(media.id.as_deref(), Some("media_9"));
    }

    #[test]
    fn test_image_size_overflow() {
        let result = import(&ImageTransformer::new(), "![a](/a.png =99999999999x1)");
        assert!(matches!(result, Err(TransformError::InvalidSize(_))));
    }

    #[test]
    fn test_export_selects_by_variant() {
        let emoji = EditorNode::from(InlineMediaNode::image("/p.gif", "emoji:p"));
        let image = EditorNode::from(InlineMediaNode::image("/c.png", "cat"));

        let emoji_t = EmojiTransformer::new(resolver());
        let image_t = ImageTransformer::new();
        assert!(emoji_t.export(&emoji).is_some());
        assert!(emoji_t.export(&image).is_none());
        assert!(image_t.export(&image).is_some());
        assert!(image_t.export(&emoji).is_none());
        assert!(MentionTransformer::new().export(&image).is_none());
    }
}
