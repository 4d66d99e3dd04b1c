//! Emoji dataset types
//!
//! `Raw*` types mirror the JSON shape of the upstream emoji dataset and custom
//! packs. [`EmojiDataMap`] is the normalized, read-only form built from them by
//! [`super::normalize`].

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::DataError;

// ============================================================================
// Raw dataset (deserialized as-is)
// ============================================================================

/// A single skin variant as found in the dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSkin {
    #[serde(default)]
    pub unified: Option<String>,
    #[serde(default)]
    pub native: Option<String>,
    #[serde(default)]
    pub shortcodes: Option<String>,
    #[serde(default)]
    pub src: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEmoji {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub skins: Vec<RawSkin>,
    #[serde(default)]
    pub version: Option<f64>,
    #[serde(default)]
    pub emoticons: Vec<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCategory {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub emojis: Vec<String>,
}

/// Per-locale, per-set emoji dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDataset {
    pub categories: Vec<RawCategory>,
    pub emojis: HashMap<String, RawEmoji>,
    /// Alternate shortcode → emoji id
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl RawDataset {
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        serde_json::from_str(json).map_err(|e| DataError::Parse(e.to_string()))
    }

    /// Load a dataset previously fetched to disk
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DataError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCustomEmoji {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub skins: Vec<RawSkin>,
    #[serde(default)]
    pub src: Option<String>,
    /// Overrides the pack-level creator
    #[serde(default)]
    pub creator: Option<String>,
    /// Allows replacing an existing entry with the same id
    #[serde(default, rename = "override")]
    pub overrides: bool,
    #[serde(default)]
    pub emoticons: Vec<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// A user- or community-provided set of image emoji
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomPack {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    pub emojis: Vec<RawCustomEmoji>,
}

impl CustomPack {
    pub fn from_json(json: &str) -> Result<Vec<Self>, DataError> {
        serde_json::from_str(json).map_err(|e| DataError::Parse(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Vec<Self>, DataError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DataError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }
}

// ============================================================================
// Normalized data
// ============================================================================

/// A resolved skin variant. Custom emoji have `src` and no glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skin {
    pub native: Option<String>,
    pub unified: Option<String>,
    pub shortcode: Option<String>,
    pub src: Option<String>,
}

/// A normalized emoji. Default fields reflect skin 0.
#[derive(Debug, Clone, PartialEq)]
pub struct EmojiRecord {
    pub id: String,
    pub name: String,
    /// `:id:` form (bare id for custom emoji, without the creator namespace)
    pub shortcode: String,
    pub native: Option<String>,
    pub unified: Option<String>,
    /// Deduplicated, in dataset order
    pub keywords: Vec<String>,
    pub skins: Vec<Skin>,
    pub creator: Option<String>,
    pub src: Option<String>,
    pub version: Option<f64>,
    pub aliases: Vec<String>,
    pub emoticons: Vec<String>,
    /// `,token,token,` string scanned by search
    pub search_blob: String,
}

impl EmojiRecord {
    /// Shortcode with the surrounding colons stripped
    pub fn bare_shortcode(&self) -> &str {
        self.shortcode.trim_matches(':')
    }

    pub fn is_custom(&self) -> bool {
        self.native.is_none() && self.src.is_some()
    }

    /// Skin for a 1-based tone, falling back to the default skin
    pub fn skin(&self, tone: u8) -> Option<&Skin> {
        let idx = usize::from(tone.saturating_sub(1));
        self.skins.get(idx).or_else(|| self.skins.first())
    }

    /// Glyph for a 1-based tone, if this is a native emoji
    pub fn native_for_tone(&self, tone: u8) -> Option<&str> {
        self.skin(tone)
            .and_then(|s| s.native.as_deref())
            .or(self.native.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDescriptor {
    pub id: String,
    pub name: Option<String>,
    pub emojis: Vec<String>,
    /// Built from a custom pack rather than the base dataset
    pub custom: bool,
}

/// Indexed lookup structures built once per (set, locale, custom packs)
#[derive(Debug, Clone, Default)]
pub struct EmojiDataMap {
    pub categories: Vec<CategoryDescriptor>,
    pub emojis: BTreeMap<String, EmojiRecord>,
    pub aliases: HashMap<String, String>,
    pub emoticons: HashMap<String, String>,
    pub natives: HashMap<String, String>,
}

impl EmojiDataMap {
    pub fn len(&self) -> usize {
        self.emojis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emojis.is_empty()
    }

    /// Resolve an id, alias, `:shortcode:`, emoticon or native glyph to its canonical id
    pub fn canonical_id(&self, reference: &str) -> Option<&str> {
        if let Some((id, _)) = self.emojis.get_key_value(reference) {
            return Some(id.as_str());
        }

        let stripped = reference.trim_matches(':');
        if let Some((id, _)) = self.emojis.get_key_value(stripped) {
            return Some(id.as_str());
        }

        self.aliases
            .get(stripped)
            .or_else(|| self.emoticons.get(reference))
            .or_else(|| self.natives.get(reference))
            .map(String::as_str)
    }

    /// Look up a record by any reference accepted by [`Self::canonical_id`]
    pub fn get(&self, reference: &str) -> Option<&EmojiRecord> {
        self.canonical_id(reference)
            .and_then(|id| self.emojis.get(id))
    }

    pub fn records(&self) -> impl Iterator<Item = &EmojiRecord> {
        self.emojis.values()
    }

    pub fn category(&self, id: &str) -> Option<&CategoryDescriptor> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// References in the lookup maps that do not point at a known record
    pub fn dangling_references(&self) -> Vec<(&str, &str)> {
        self.aliases
            .iter()
            .chain(&self.emoticons)
            .chain(&self.natives)
            .filter(|(_, id)| !self.emojis.contains_key(id.as_str()))
            .map(|(key, id)| (key.as_str(), id.as_str()))
            .collect()
    }
}
