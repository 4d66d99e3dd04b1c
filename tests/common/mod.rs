//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::sync::Arc;

use feed_composer::document::MentionUser;
use feed_composer::emoji::{
    normalize, CustomPack, DataMapResolver, EmojiDataMap, FrequencyStore, MemoryStore,
    NormalizeOptions, RawDataset,
};
use feed_composer::markdown::Pipeline;
use feed_composer::{Composer, ComposerConfig};

pub const DATASET_JSON: &str = include_str!("../fixtures/dataset.json");
pub const DEVHUB_PACK_JSON: &str = include_str!("../fixtures/devhub.json");

pub fn raw_dataset() -> RawDataset {
    RawDataset::from_json(DATASET_JSON).expect("fixture dataset parses")
}

pub fn devhub_packs() -> Vec<CustomPack> {
    CustomPack::from_json(DEVHUB_PACK_JSON).expect("fixture pack parses")
}

/// Base dataset only
pub fn base_map() -> EmojiDataMap {
    normalize(&raw_dataset(), &[], &NormalizeOptions::default()).expect("fixture normalizes")
}

/// Base dataset plus the devhub custom pack
pub fn full_map() -> EmojiDataMap {
    normalize(&raw_dataset(), &devhub_packs(), &NormalizeOptions::default())
        .expect("fixture normalizes")
}

pub fn pipeline(map: EmojiDataMap) -> Pipeline {
    Pipeline::new(Arc::new(DataMapResolver::new(Arc::new(map), "twitter")))
}

pub fn memory_frequency() -> FrequencyStore {
    FrequencyStore::load(Box::new(MemoryStore::new()))
}

pub fn composer() -> Composer {
    Composer::new(
        Arc::new(full_map()),
        memory_frequency(),
        &ComposerConfig::default(),
    )
}

pub fn user(id: &str, username: &str, display_name: &str) -> MentionUser {
    MentionUser {
        id: id.to_string(),
        username: username.to_string(),
        display_name: display_name.to_string(),
        avatar_url: None,
    }
}

/// Ids of the given records, for compact assertions
pub fn ids<'a>(records: impl IntoIterator<Item = &'a feed_composer::emoji::EmojiRecord>) -> Vec<String> {
    records.into_iter().map(|r| r.id.clone()).collect()
}
