//! Document node model
//!
//! ```text
//! Document
//! └── [EditorNode]
//!     ├── Text(TextNode)
//!     ├── Mention(MentionNode)          @[Name](mention:id:username[:avatar])
//!     └── InlineMedia(InlineMediaNode)  ![alt](idOrSrc)
//! ```

mod node;
mod tree;

pub use node::{
    unescape_field, EditorNode, InlineMediaNode, MentionNode, MentionUser, TextNode,
    EMOJI_ALT_PREFIX, MENTION_SCHEME,
};
pub use tree::{Document, DocumentError, NodePosition};
