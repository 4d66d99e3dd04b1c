//! Centralized configuration paths for feed-composer
//!
//! All per-user files live under:
//! - Unix/macOS: `~/.config/feed-composer/`
//! - Windows: `%APPDATA%\feed-composer\`
//!
//! This module is the single source of truth for those paths.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "feed-composer";

/// Base config directory for feed-composer
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/feed-composer`
///   - Else: `~/.config/feed-composer`
///
/// Windows:
///   - `%APPDATA%\feed-composer`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/feed-composer/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/feed-composer/store.json` (usage history, skin tone)
pub fn store_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("store.json"))
}

/// `~/.config/feed-composer/emoji/` (cached datasets and custom packs)
pub fn emoji_data_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("emoji"))
}

/// `~/.config/feed-composer/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure the base config dir exists, returning it
pub fn ensure_config_dir() -> Result<PathBuf, String> {
    let dir = config_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let config = ensure_config_dir()?;
    let logs = config.join("logs");
    ensure_dir(&logs)?;
    Ok(logs)
}
