//! Emoji id → displayable image URL

use std::sync::Arc;

use super::data::EmojiDataMap;

/// Canonical id and image location for an emoji reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEmoji {
    pub id: String,
    pub src: String,
}

/// Resolves emoji references found in imported Markdown
pub trait EmojiResolver {
    fn resolve(&self, reference: &str) -> Option<ResolvedEmoji>;
}

impl<F> EmojiResolver for F
where
    F: Fn(&str) -> Option<ResolvedEmoji>,
{
    fn resolve(&self, reference: &str) -> Option<ResolvedEmoji> {
        self(reference)
    }
}

/// Default image URL for native emoji, filled with `{set}` and `{unified}`
pub const DEFAULT_IMAGE_URL: &str =
    "https://cdn.jsdelivr.net/npm/emoji-datasource-{set}@15.0.1/img/{set}/64/{unified}.png";

/// Resolver backed by a normalized data map
///
/// Custom emoji resolve to their own `src`; native emoji resolve to the
/// configured image URL for their codepoints.
#[derive(Debug, Clone)]
pub struct DataMapResolver {
    map: Arc<EmojiDataMap>,
    set: String,
    url_template: String,
}

impl DataMapResolver {
    pub fn new(map: Arc<EmojiDataMap>, set: impl Into<String>) -> Self {
        Self {
            map,
            set: set.into(),
            url_template: DEFAULT_IMAGE_URL.to_string(),
        }
    }

    pub fn with_url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = template.into();
        self
    }
}

impl EmojiResolver for DataMapResolver {
    fn resolve(&self, reference: &str) -> Option<ResolvedEmoji> {
        let record = self.map.get(reference)?;

        let src = match (&record.src, &record.unified) {
            (Some(src), _) => src.clone(),
            (None, Some(unified)) => self
                .url_template
                .replace("{set}", &self.set)
                .replace("{unified}", unified),
            (None, None) => {
                tracing::debug!("Emoji '{}' has neither image nor codepoints", record.id);
                return None;
            }
        };

        Some(ResolvedEmoji {
            id: record.id.clone(),
            src,
        })
    }
}
