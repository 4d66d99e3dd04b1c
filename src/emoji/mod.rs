//! Emoji data, search and usage tracking
//!
//! # Architecture
//!
//! ```text
//! RawDataset + [CustomPack] ──normalize()──▶ EmojiDataMap ──search()──▶ [&EmojiRecord]
//!                                                 │
//!                                                 └──DataMapResolver──▶ id → URL
//!
//! KeyValueStore ──▶ FrequencyStore (usage counts, last used, skin tone)
//! ```
//!
//! The data map is built once per configuration and shared read-only.

mod data;
mod frequency;
mod normalize;
mod resolve;
mod search;
mod store;

pub use data::{
    CategoryDescriptor, CustomPack, EmojiDataMap, EmojiRecord, RawCategory, RawCustomEmoji,
    RawDataset, RawEmoji, RawSkin, Skin,
};
pub use frequency::{FrequencyIndex, FrequencyStore, DEFAULT_FREQUENT, DEFAULT_SKIN_TONE};
pub use normalize::{build_search_blob, normalize, NormalizeOptions};
pub use resolve::{DataMapResolver, EmojiResolver, ResolvedEmoji, DEFAULT_IMAGE_URL};
pub use search::{normalize_query, search, DEFAULT_MAX_RESULTS};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

/// Errors raised while loading or normalizing emoji data
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    Io(String),
    Parse(String),
    /// Two entries share an id and neither is an explicit override
    DuplicateId { id: String, pack: String },
    /// A custom emoji without an image source
    MissingSource { id: String, pack: String },
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::Io(e) => write!(f, "IO error: {}", e),
            DataError::Parse(e) => write!(f, "Parse error: {}", e),
            DataError::DuplicateId { id, pack } => {
                write!(f, "Duplicate emoji id '{}' in pack '{}'", id, pack)
            }
            DataError::MissingSource { id, pack } => {
                write!(f, "Custom emoji '{}' in pack '{}' has no image source", id, pack)
            }
        }
    }
}

impl std::error::Error for DataError {}
