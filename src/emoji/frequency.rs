//! Frequently used emoji tracking
//!
//! Usage counts and the last used id are kept in memory and written through to
//! a [`KeyValueStore`] on every change. The in-memory index is authoritative;
//! failed writes are logged and otherwise ignored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::store::{KeyValueStore, StoreError};

/// Prefix for every key this module writes
const NAMESPACE: &str = "composer";

const FREQUENT_KEY: &str = "frequently";
const SKIN_KEY: &str = "skin";

/// Default skin tone (no modifier)
pub const DEFAULT_SKIN_TONE: u8 = 1;
const MAX_SKIN_TONE: u8 = 6;

/// Shortlist shown before any usage is recorded
pub const DEFAULT_FREQUENT: &[&str] = &[
    "+1",
    "grinning",
    "kissing_heart",
    "heart_eyes",
    "laughing",
    "stuck_out_tongue_winking_eye",
    "sweat_smile",
    "joy",
    "scream",
    "disappointed",
    "unamused",
    "weary",
    "sob",
    "sunglasses",
    "heart",
];

/// Usage counts plus the most recently used id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyIndex {
    pub counts: HashMap<String, u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

impl FrequencyIndex {
    /// Ids ordered by descending count, ties by ascending id
    pub fn sorted_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.counts.keys().cloned().collect();
        ids.sort_by(|a, b| self.counts[b].cmp(&self.counts[a]).then_with(|| a.cmp(b)));
        ids
    }
}

fn key(name: &str) -> String {
    format!("{}.{}", NAMESPACE, name)
}

/// Per-user emoji usage and preferences
pub struct FrequencyStore {
    backing: Box<dyn KeyValueStore>,
    /// `None` until something is recorded or the defaults are seeded
    index: Option<FrequencyIndex>,
    skin_tone: u8,
}

impl std::fmt::Debug for FrequencyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrequencyStore")
            .field("index", &self.index)
            .field("skin_tone", &self.skin_tone)
            .finish_non_exhaustive()
    }
}

impl FrequencyStore {
    /// Hydrate from the backing store. Missing or unreadable keys fall back to defaults.
    pub fn load(backing: Box<dyn KeyValueStore>) -> Self {
        let index = match backing.get(&key(FREQUENT_KEY)) {
            Ok(Some(json)) => match serde_json::from_str::<FrequencyIndex>(&json) {
                Ok(index) => Some(index),
                Err(e) => {
                    tracing::warn!("Discarding unreadable emoji usage history: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read emoji usage history: {}", e);
                None
            }
        };

        let skin_tone = match backing.get(&key(SKIN_KEY)) {
            Ok(Some(json)) => serde_json::from_str::<u8>(&json)
                .ok()
                .filter(|tone| (1..=MAX_SKIN_TONE).contains(tone))
                .unwrap_or(DEFAULT_SKIN_TONE),
            Ok(None) => DEFAULT_SKIN_TONE,
            Err(e) => {
                tracing::warn!("Failed to read skin tone: {}", e);
                DEFAULT_SKIN_TONE
            }
        };

        tracing::debug!(
            "Loaded emoji usage ({} entries, skin tone {})",
            index.as_ref().map_or(0, |i| i.counts.len()),
            skin_tone
        );

        Self {
            backing,
            index,
            skin_tone,
        }
    }

    /// Count one use of `id` and make it the last used emoji
    pub fn record(&mut self, id: &str) {
        let index = self.index.get_or_insert_with(FrequencyIndex::default);
        *index.counts.entry(id.to_string()).or_insert(0) += 1;
        index.last = Some(id.to_string());

        if let Err(e) = self.write_index() {
            tracing::warn!("Failed to persist emoji usage: {}", e);
        }
    }

    /// Frequently used ids, at most `max_rows * per_line` of them.
    ///
    /// Evicts entries beyond the cap, except the last used id. If the last used
    /// id fell outside the kept list it replaces the tail entry, which is then
    /// evicted; the index may stay one over the cap until the next call.
    pub fn list(&mut self, max_rows: usize, per_line: usize) -> Vec<String> {
        if max_rows == 0 || per_line == 0 {
            return Vec::new();
        }

        let Some(index) = self.index.as_mut() else {
            return self.seed_defaults(per_line);
        };

        let max = max_rows * per_line;
        let mut ids = index.sorted_ids();
        if ids.len() <= max {
            return ids;
        }

        let removed = ids.split_off(max);
        let last = index.last.clone();
        for id in &removed {
            if Some(id) != last.as_ref() {
                index.counts.remove(id);
            }
        }

        if let Some(last) = last {
            if !ids.contains(&last) {
                if let Some(tail) = ids.pop() {
                    index.counts.remove(&tail);
                }
                ids.push(last);
            }
        }

        tracing::debug!("Evicted {} emoji usage entries", removed.len());
        if let Err(e) = self.write_index() {
            tracing::warn!("Failed to persist emoji usage: {}", e);
        }
        ids
    }

    /// Cold start: the first `per_line` defaults with descending synthetic scores
    fn seed_defaults(&mut self, per_line: usize) -> Vec<String> {
        let defaults: Vec<String> = DEFAULT_FREQUENT
            .iter()
            .take(per_line)
            .map(|id| id.to_string())
            .collect();

        let counts = defaults
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), (per_line - i) as u32))
            .collect();
        self.index = Some(FrequencyIndex { counts, last: None });

        defaults
    }

    pub fn count(&self, id: &str) -> u32 {
        self.index
            .as_ref()
            .and_then(|i| i.counts.get(id).copied())
            .unwrap_or(0)
    }

    pub fn last_used(&self) -> Option<&str> {
        self.index.as_ref().and_then(|i| i.last.as_deref())
    }

    pub fn index(&self) -> Option<&FrequencyIndex> {
        self.index.as_ref()
    }

    /// Selected skin tone, 1 (default) through 6
    pub fn skin_tone(&self) -> u8 {
        self.skin_tone
    }

    /// Select a skin tone; values outside 1..=6 are clamped
    pub fn set_skin_tone(&mut self, tone: u8) {
        self.skin_tone = tone.clamp(DEFAULT_SKIN_TONE, MAX_SKIN_TONE);
        if let Err(e) = self
            .backing
            .set(&key(SKIN_KEY), self.skin_tone.to_string())
        {
            tracing::warn!("Failed to persist skin tone: {}", e);
        }
    }

    /// Write all in-memory state to the backing store
    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.write_index()?;
        self.backing.set(&key(SKIN_KEY), self.skin_tone.to_string())
    }

    /// Forget all usage history
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.index = None;
        self.backing.remove(&key(FREQUENT_KEY))
    }

    /// Give back the backing store, e.g. to hand it to a new session
    pub fn into_backing(self) -> Box<dyn KeyValueStore> {
        self.backing
    }

    fn write_index(&mut self) -> Result<(), StoreError> {
        let Some(index) = &self.index else {
            return Ok(());
        };
        let json =
            serde_json::to_string(index).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.backing.set(&key(FREQUENT_KEY), json)
    }
}
