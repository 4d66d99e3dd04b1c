//! Feed composer rich-text core
//!
//! This crate provides the document model, Markdown transform pipeline,
//! `@mention`/`:emoji:` trigger detection and the emoji data, search and
//! frequency engine behind a social feed's post composer.

pub mod composer;
pub mod config;
pub mod config_paths;
pub mod document;
pub mod emoji;
pub mod markdown;
pub mod tracing;
pub mod trigger;

// Re-export commonly used types
pub use composer::{Composer, ComposerError};
pub use config::ComposerConfig;
pub use document::{Document, EditorNode};
pub use emoji::{EmojiDataMap, FrequencyStore};
pub use markdown::Pipeline;
pub use trigger::{detect, TriggerMatch};
