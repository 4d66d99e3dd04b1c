//! Emoji data normalization
//!
//! Flattens skin variants, precomputes search blobs and builds the alias,
//! emoticon and native lookup maps. Custom packs are merged last.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::data::{
    CategoryDescriptor, CustomPack, EmojiDataMap, EmojiRecord, RawCustomEmoji, RawDataset,
    RawEmoji, RawSkin, Skin,
};
use super::DataError;

/// Category holding country and regional flags
const FLAGS_CATEGORY: &str = "flags";

/// Filters applied while normalizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Emoji ids to leave out entirely
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Allowed base categories, in display order. `None` keeps all.
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    /// Highest emoji version the platform renders
    #[serde(default)]
    pub emoji_version: Option<f64>,
    #[serde(default = "default_country_flags")]
    pub country_flags: bool,
}

fn default_country_flags() -> bool {
    true
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            categories: None,
            emoji_version: None,
            country_flags: default_country_flags(),
        }
    }
}

/// Build an [`EmojiDataMap`] from a base dataset and custom packs
pub fn normalize(
    raw: &RawDataset,
    packs: &[CustomPack],
    options: &NormalizeOptions,
) -> Result<EmojiDataMap, DataError> {
    let excluded: HashSet<&str> = options.exclude.iter().map(String::as_str).collect();
    let mut map = EmojiDataMap::default();

    for category in select_categories(raw, options) {
        let mut descriptor = CategoryDescriptor {
            id: category.id.clone(),
            name: category.name.clone(),
            emojis: Vec::with_capacity(category.emojis.len()),
            custom: false,
        };

        for id in &category.emojis {
            if excluded.contains(id.as_str()) {
                continue;
            }
            let Some(emoji) = raw.emojis.get(id) else {
                tracing::debug!("Category '{}' lists unknown emoji '{}'", category.id, id);
                continue;
            };
            if !version_supported(emoji.version, options.emoji_version) {
                continue;
            }

            if !map.emojis.contains_key(&emoji.id) {
                let record = normalize_emoji(emoji);
                register_lookups(&mut map, &record);
                map.emojis.insert(record.id.clone(), record);
            }
            descriptor.emojis.push(emoji.id.clone());
        }

        map.categories.push(descriptor);
    }

    for (alias, id) in &raw.aliases {
        if map.emojis.contains_key(id) && !map.emojis.contains_key(alias) {
            map.aliases.entry(alias.clone()).or_insert_with(|| id.clone());
        }
    }

    for pack in packs {
        merge_pack(&mut map, pack, &excluded)?;
    }

    tracing::debug!(
        "Normalized {} emojis in {} categories ({} aliases, {} emoticons)",
        map.emojis.len(),
        map.categories.len(),
        map.aliases.len(),
        map.emoticons.len()
    );

    Ok(map)
}

fn select_categories<'a>(
    raw: &'a RawDataset,
    options: &NormalizeOptions,
) -> Vec<&'a super::data::RawCategory> {
    let keep_flags = |id: &str| options.country_flags || id != FLAGS_CATEGORY;

    match &options.categories {
        Some(allowed) => allowed
            .iter()
            .filter(|id| keep_flags(id))
            .filter_map(|id| raw.categories.iter().find(|c| &c.id == id))
            .collect(),
        None => raw
            .categories
            .iter()
            .filter(|c| keep_flags(&c.id))
            .collect(),
    }
}

fn version_supported(version: Option<f64>, supported: Option<f64>) -> bool {
    match (version, supported) {
        (Some(v), Some(max)) => v <= max,
        _ => true,
    }
}

fn normalize_emoji(emoji: &RawEmoji) -> EmojiRecord {
    let skins: Vec<Skin> = emoji
        .skins
        .iter()
        .enumerate()
        .map(|(tone, skin)| resolve_skin(&emoji.id, tone, skin))
        .collect();
    let default_skin = skins.first();

    EmojiRecord {
        id: emoji.id.clone(),
        name: emoji.name.clone(),
        shortcode: format!(":{}:", emoji.id),
        native: default_skin.and_then(|s| s.native.clone()),
        unified: default_skin.and_then(|s| s.unified.clone()),
        keywords: dedup(&emoji.keywords),
        creator: None,
        src: default_skin.and_then(|s| s.src.clone()),
        version: emoji.version,
        aliases: dedup(&emoji.aliases),
        emoticons: dedup(&emoji.emoticons),
        search_blob: build_search_blob(
            &emoji.id,
            &emoji.name,
            &emoji.aliases,
            &emoji.keywords,
            &emoji.emoticons,
        ),
        skins,
    }
}

/// Skin 0 uses `:id:`, tone N uses `:id::skin-tone-N:` unless the dataset says otherwise
fn resolve_skin(id: &str, tone: usize, skin: &RawSkin) -> Skin {
    let shortcode = skin.shortcodes.clone().unwrap_or_else(|| {
        if tone == 0 {
            format!(":{}:", id)
        } else {
            format!(":{}::skin-tone-{}:", id, tone + 1)
        }
    });

    Skin {
        native: skin.native.clone(),
        unified: skin.unified.as_ref().map(|u| u.to_lowercase()),
        shortcode: Some(shortcode),
        src: skin.src.clone(),
    }
}

fn normalize_custom(emoji: &RawCustomEmoji, id: String, creator: Option<String>) -> EmojiRecord {
    let mut skins: Vec<Skin> = emoji
        .skins
        .iter()
        .map(|skin| Skin {
            native: None,
            unified: None,
            shortcode: skin.shortcodes.clone(),
            src: skin.src.clone(),
        })
        .collect();
    if skins.is_empty() {
        skins.push(Skin {
            native: None,
            unified: None,
            shortcode: None,
            src: emoji.src.clone(),
        });
    }
    let src = emoji
        .src
        .clone()
        .or_else(|| skins.iter().find_map(|s| s.src.clone()));

    EmojiRecord {
        search_blob: build_search_blob(
            &emoji.id,
            &emoji.name,
            &emoji.aliases,
            &emoji.keywords,
            &emoji.emoticons,
        ),
        id,
        name: emoji.name.clone(),
        shortcode: format!(":{}:", emoji.id),
        native: None,
        unified: None,
        keywords: dedup(&emoji.keywords),
        skins,
        creator,
        src,
        version: None,
        aliases: dedup(&emoji.aliases),
        emoticons: dedup(&emoji.emoticons),
    }
}

fn merge_pack(
    map: &mut EmojiDataMap,
    pack: &CustomPack,
    excluded: &HashSet<&str>,
) -> Result<(), DataError> {
    let mut descriptor = CategoryDescriptor {
        id: pack.id.clone(),
        name: pack.name.clone(),
        emojis: Vec::with_capacity(pack.emojis.len()),
        custom: true,
    };

    for emoji in &pack.emojis {
        let creator = emoji.creator.clone().or_else(|| pack.creator.clone());
        let id = match &creator {
            Some(creator) => format!("{}:{}", creator, emoji.id),
            None => emoji.id.clone(),
        };
        if excluded.contains(id.as_str()) || excluded.contains(emoji.id.as_str()) {
            continue;
        }

        let record = normalize_custom(emoji, id.clone(), creator);
        if record.src.is_none() {
            return Err(DataError::MissingSource {
                id,
                pack: pack.id.clone(),
            });
        }

        if map.emojis.contains_key(&id) {
            if !emoji.overrides {
                return Err(DataError::DuplicateId {
                    id,
                    pack: pack.id.clone(),
                });
            }
            tracing::debug!("Custom emoji '{}' overrides existing entry", id);
            forget_lookups(map, &id);
        }

        register_lookups(map, &record);
        if record.creator.is_some() {
            let bare = emoji.id.clone();
            if map.emojis.contains_key(&bare) {
                tracing::debug!("Bare id '{}' shadowed by an existing emoji", bare);
            } else if let Some(existing) = map.aliases.get(&bare) {
                tracing::debug!("Bare id '{}' already aliases '{}'", bare, existing);
            } else {
                map.aliases.insert(bare, id.clone());
            }
        }

        map.emojis.insert(id.clone(), record);
        if !descriptor.emojis.contains(&id) {
            descriptor.emojis.push(id);
        }
    }

    // An override may have moved an entry out of a base category
    for category in &mut map.categories {
        category
            .emojis
            .retain(|member| !descriptor.emojis.contains(member) || category.id == pack.id);
    }
    map.categories.push(descriptor);

    Ok(())
}

fn register_lookups(map: &mut EmojiDataMap, record: &EmojiRecord) {
    for alias in &record.aliases {
        if alias != &record.id && !map.emojis.contains_key(alias) {
            map.aliases
                .entry(alias.clone())
                .or_insert_with(|| record.id.clone());
        }
    }
    for emoticon in &record.emoticons {
        map.emoticons
            .entry(emoticon.clone())
            .or_insert_with(|| record.id.clone());
    }
    for native in record.skins.iter().filter_map(|s| s.native.as_ref()) {
        map.natives
            .entry(native.clone())
            .or_insert_with(|| record.id.clone());
    }
}

fn forget_lookups(map: &mut EmojiDataMap, id: &str) {
    map.aliases.retain(|_, target| target != id);
    map.emoticons.retain(|_, target| target != id);
    map.natives.retain(|_, target| target != id);
}

/// Build the `,token,token,` blob scanned by search.
///
/// Names are split into words; ids, aliases, keywords and emoticons are kept
/// whole. Tokens are lower-cased and deduplicated in first-seen order.
pub fn build_search_blob(
    id: &str,
    name: &str,
    aliases: &[String],
    keywords: &[String],
    emoticons: &[String],
) -> String {
    let name_words = name
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty());

    let mut seen = HashSet::new();
    let mut blob = String::new();
    let tokens = std::iter::once(id)
        .chain(aliases.iter().map(String::as_str))
        .chain(name_words)
        .chain(keywords.iter().map(String::as_str))
        .chain(emoticons.iter().map(String::as_str));

    for token in tokens {
        let token = token.trim().to_lowercase();
        if token.is_empty() || !seen.insert(token.clone()) {
            continue;
        }
        blob.push(',');
        blob.push_str(&token);
    }
    blob.push(',');
    blob
}

fn dedup(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .filter(|v| seen.insert(v.as_str()))
        .cloned()
        .collect()
}
