//! Inline document nodes
//!
//! The node set is closed: plain text, user mentions and inline media (images
//! and image emoji). Every node serializes to the Markdown micro-grammar:
//!
//! ```text
//! Mention:      @[DisplayName](mention:<userId>:<username>[:<avatarUrl>])
//! Inline emoji: ![emoji:<name>](<emojiIdOrUrl>[ =<w>x<h>])
//! Inline image: ![<alt>](<idOrSrc>[ =<w>x<h>])
//! ```
//!
//! Field values are backslash-escaped where they hold a delimiter of their
//! field: `]` in labels, `)` and whitespace in link targets, and `:` in the
//! mention id and username. A backslash itself is always escaped.

use crate::emoji::ResolvedEmoji;

/// Alt-text prefix marking an inline media node as an emoji
pub const EMOJI_ALT_PREFIX: &str = "emoji:";

/// Scheme marking a mention link target
pub const MENTION_SCHEME: &str = "mention:";

fn escape_field(value: &str, delimiter: impl Fn(char) -> bool) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '\\' || delimiter(ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn is_label_delimiter(ch: char) -> bool {
    ch == ']'
}

fn is_target_delimiter(ch: char) -> bool {
    ch == ')' || ch.is_whitespace()
}

fn is_mention_field_delimiter(ch: char) -> bool {
    ch == ':' || is_target_delimiter(ch)
}

/// Undo field escaping: `\x` becomes `x`; a trailing lone backslash is kept
pub fn unescape_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push(chars.next().unwrap_or('\\')),
            _ => out.push(ch),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub content: String,
}

impl TextNode {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// The user a mention points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionUser {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionNode {
    pub user: MentionUser,
}

impl MentionNode {
    pub fn new(user: MentionUser) -> Self {
        Self { user }
    }

    /// `@[displayName](mention:id:username[:avatarUrl])`
    pub fn serialize(&self) -> String {
        let user = &self.user;
        let mut out = format!(
            "@[{}]({}{}:{}",
            escape_field(&user.display_name, is_label_delimiter),
            MENTION_SCHEME,
            escape_field(&user.id, is_mention_field_delimiter),
            escape_field(&user.username, is_mention_field_delimiter)
        );
        if let Some(avatar) = &user.avatar_url {
            out.push(':');
            out.push_str(&escape_field(avatar, is_target_delimiter));
        }
        out.push(')');
        out
    }
}

/// An inline image or image emoji
///
/// `id` is the stable reference when present; `src` is where the image can be
/// loaded from right now and may be temporary.
#[derive(Debug, Clone)]
pub struct InlineMediaNode {
    pub src: String,
    pub alt: String,
    pub id: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl InlineMediaNode {
    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            id: None,
            width: None,
            height: None,
        }
    }

    /// Image emoji named `name` (its bare shortcode), resolved to a canonical id
    pub fn emoji(name: &str, resolved: ResolvedEmoji) -> Self {
        Self {
            src: resolved.src,
            alt: format!("{}{}", EMOJI_ALT_PREFIX, name),
            id: Some(resolved.id),
            width: None,
            height: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_size(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn is_emoji(&self) -> bool {
        self.alt.starts_with(EMOJI_ALT_PREFIX)
    }

    /// Emoji name from the alt text, if this is an emoji
    pub fn emoji_name(&self) -> Option<&str> {
        self.alt.strip_prefix(EMOJI_ALT_PREFIX)
    }

    /// What the link target serializes to: the id when present, else the src
    pub fn reference(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.src)
    }

    pub fn serialize(&self) -> String {
        let mut out = format!(
            "![{}]({}",
            escape_field(&self.alt, is_label_delimiter),
            escape_field(self.reference(), is_target_delimiter)
        );
        if self.width.is_some() || self.height.is_some() {
            out.push_str(" =");
            if let Some(w) = self.width {
                out.push_str(&w.to_string());
            }
            out.push('x');
            if let Some(h) = self.height {
                out.push_str(&h.to_string());
            }
        }
        out.push(')');
        out
    }
}

/// Two media nodes are equal when they point at the same thing.
///
/// The target is compared through [`InlineMediaNode::reference`]; a `src`
/// sitting next to an `id` is a derived location and does not take part.
impl PartialEq for InlineMediaNode {
    fn eq(&self, other: &Self) -> bool {
        self.reference() == other.reference()
            && self.alt == other.alt
            && self.width == other.width
            && self.height == other.height
    }
}

impl Eq for InlineMediaNode {}

/// A node in a composer document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorNode {
    Text(TextNode),
    Mention(MentionNode),
    InlineMedia(InlineMediaNode),
}

impl EditorNode {
    pub fn text(content: impl Into<String>) -> Self {
        EditorNode::Text(TextNode::new(content))
    }

    pub fn mention(user: MentionUser) -> Self {
        EditorNode::Mention(MentionNode::new(user))
    }

    /// Markdown form of this node. Text is emitted as-is.
    pub fn serialize(&self) -> String {
        match self {
            EditorNode::Text(node) => node.content.clone(),
            EditorNode::Mention(node) => node.serialize(),
            EditorNode::InlineMedia(node) => node.serialize(),
        }
    }

    /// Every node in the composer flows inline with text
    pub fn is_inline(&self) -> bool {
        match self {
            EditorNode::Text(_) | EditorNode::Mention(_) | EditorNode::InlineMedia(_) => true,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            EditorNode::Text(node) => Some(node),
            _ => None,
        }
    }

    /// Human-readable text, e.g. for length limits and notifications
    pub fn plain_text(&self) -> String {
        match self {
            EditorNode::Text(node) => node.content.clone(),
            EditorNode::Mention(node) => format!("@{}", node.user.display_name),
            EditorNode::InlineMedia(node) => match node.emoji_name() {
                Some(name) => format!(":{}:", name),
                None => node.alt.clone(),
            },
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            EditorNode::Text(_) => "text",
            EditorNode::Mention(_) => "mention",
            EditorNode::InlineMedia(_) => "inline-media",
        }
    }
}

impl From<TextNode> for EditorNode {
    fn from(node: TextNode) -> Self {
        EditorNode::Text(node)
    }
}

impl From<MentionNode> for EditorNode {
    fn from(node: MentionNode) -> Self {
        EditorNode::Mention(node)
    }
}

impl From<InlineMediaNode> for EditorNode {
    fn from(node: InlineMediaNode) -> Self {
        EditorNode::InlineMedia(node)
    }
}
