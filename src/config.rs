//! Composer configuration persistence
//!
//! Stores user preferences in `~/.config/feed-composer/config.yaml`

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::emoji::{
    normalize, CustomPack, DataError, EmojiDataMap, NormalizeOptions, RawDataset,
    DEFAULT_MAX_RESULTS,
};

/// Composer configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Emoji render set (e.g., "native", "twitter", "apple")
    #[serde(default = "default_emoji_set")]
    pub emoji_set: String,

    #[serde(default = "default_locale")]
    pub locale: String,

    /// Dataset file; defaults to `emoji/<locale>.json` in the config dir
    #[serde(default)]
    pub dataset: Option<PathBuf>,

    /// Custom emoji pack files, merged in order
    #[serde(default)]
    pub custom_packs: Vec<PathBuf>,

    /// Image URL for native emoji, with `{set}` and `{unified}` placeholders
    #[serde(default = "default_image_url")]
    pub image_url: String,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Rows of frequently used emoji shown in the picker
    #[serde(default = "default_max_frequent_rows")]
    pub max_frequent_rows: usize,

    #[serde(default = "default_per_line")]
    pub per_line: usize,

    #[serde(default)]
    pub normalize: NormalizeOptions,
}

fn default_emoji_set() -> String {
    "native".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_image_url() -> String {
    crate::emoji::DEFAULT_IMAGE_URL.to_string()
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_max_frequent_rows() -> usize {
    4
}

fn default_per_line() -> usize {
    9
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            emoji_set: default_emoji_set(),
            locale: default_locale(),
            dataset: None,
            custom_packs: Vec::new(),
            image_url: default_image_url(),
            max_results: default_max_results(),
            max_frequent_rows: default_max_frequent_rows(),
            per_line: default_per_line(),
            normalize: NormalizeOptions::default(),
        }
    }
}

impl ComposerConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| e.to_string())
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(&path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Dataset path, falling back to `emoji/<locale>.json` in the config dir
    pub fn dataset_path(&self) -> Option<PathBuf> {
        self.dataset.clone().or_else(|| {
            crate::config_paths::emoji_data_dir().map(|dir| dir.join(format!("{}.json", self.locale)))
        })
    }

    /// Cap for the frequently used list
    pub fn frequent_capacity(&self) -> usize {
        self.max_frequent_rows * self.per_line
    }

    /// Load the dataset and custom packs and build the data map
    pub fn load_data(&self) -> Result<EmojiDataMap, DataError> {
        let path = self
            .dataset_path()
            .ok_or_else(|| DataError::Io("No emoji dataset configured".to_string()))?;
        let raw = RawDataset::load(&path)?;

        let mut packs = Vec::new();
        for pack_path in &self.custom_packs {
            packs.extend(CustomPack::load(pack_path)?);
        }

        let map = normalize(&raw, &packs, &self.normalize)?;
        tracing::info!(
            "Loaded {} emoji from {} ({} custom packs)",
            map.len(),
            path.display(),
            packs.len()
        );
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(ComposerConfig::from_yaml("{}").unwrap(), ComposerConfig::default());
    }

    #[test]
    fn test_partial_yaml() {
        let config = ComposerConfig::from_yaml(
            "emoji_set: twitter\nper_line: 8\nnormalize:\n  exclude: [eggplant]\n  country_flags: false\n",
        )
        .unwrap();
        assert_eq!(config.emoji_set, "twitter");
        assert_eq!(config.per_line, 8);
        assert_eq!(config.max_frequent_rows, 4);
        assert_eq!(config.frequent_capacity(), 32);
        assert_eq!(config.normalize.exclude, vec!["eggplant".to_string()]);
        assert!(!config.normalize.country_flags);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = ComposerConfig::default();
        config.locale = "de".to_string();
        config.custom_packs.push(PathBuf::from("/packs/devhub.json"));
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert_eq!(ComposerConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(ComposerConfig::from_yaml("per_line: many").is_err());
    }

    #[test]
    fn test_explicit_dataset_path() {
        let mut config = ComposerConfig::default();
        config.dataset = Some(PathBuf::from("/data/en.json"));
        assert_eq!(config.dataset_path(), Some(PathBuf::from("/data/en.json")));
    }

    #[test]
    fn test_load_data_missing_file() {
        let mut config = ComposerConfig::default();
        config.dataset = Some(PathBuf::from("/nonexistent/feed-composer/en.json"));
        assert!(matches!(config.load_data(), Err(DataError::Io(_))));
    }
}
