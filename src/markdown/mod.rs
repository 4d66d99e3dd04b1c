//! Bidirectional Markdown ⇄ node conversion
//!
//! ```text
//! "hi @[Ada](mention:42:ada) ![emoji:tada](tada)"
//!        │ Pipeline::import               ▲ Pipeline::export
//!        ▼                                │
//! [Text("hi "), Mention(Ada), Text(" "), InlineMedia(emoji:tada)]
//! ```
//!
//! `import(export(nodes))` reproduces the nodes for every node variant.

mod pipeline;
mod transformer;

pub use pipeline::{Pipeline, Shortcut};
pub use transformer::{
    is_bare_reference, EmojiTransformer, ImageTransformer, MentionTransformer, TransformError,
    Transformer,
};
