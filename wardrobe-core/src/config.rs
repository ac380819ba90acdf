//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "app": { "userId": "alice", "dailyLogLimit": 30 },
//!   "logging": { "level": "info" }
//! }
//! ```
//! Fields this crate does not manage are kept intact on save.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::services::usage::DEFAULT_HISTORY_LIMIT;

pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    logging: LoggingSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    daily_log_limit: Option<usize>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoggingSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    level: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Wardrobe configuration (simplified view of settings)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub user_id: Option<String>,
    pub daily_log_limit: usize,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_id: None,
            daily_log_limit: DEFAULT_HISTORY_LIMIT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Data directory: `$WARDROBE_DIR`, else `~/.wardrobe`
pub fn default_data_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("WARDROBE_DIR") {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    dirs::home_dir().map(|home| home.join(".wardrobe"))
}

fn read_settings(path: &Path) -> Result<SettingsFile> {
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

impl Config {
    /// Load config from the data directory
    ///
    /// `WARDROBE_USER` and `WARDROBE_LOG_LEVEL` override the file.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let mut config = Self::load_file(data_dir)?;
        if let Some(user) = std::env::var("WARDROBE_USER").ok().filter(|u| !u.trim().is_empty()) {
            config.user_id = Some(user);
        }
        if let Some(level) = std::env::var("WARDROBE_LOG_LEVEL").ok().filter(|l| !l.is_empty()) {
            config.log_level = level;
        }
        Ok(config)
    }

    /// Load only what settings.json holds, ignoring the environment
    ///
    /// Use this before `save` so overrides never get written back.
    pub fn load_file(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(&data_dir.join(SETTINGS_FILE))?;

        Ok(Self {
            user_id: raw.app.user_id.filter(|u| !u.trim().is_empty()),
            daily_log_limit: raw
                .app
                .daily_log_limit
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_HISTORY_LIMIT),
            log_level: raw
                .logging
                .level
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    /// Save config to the data directory
    /// Preserves other settings that this crate doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;
        let settings_path = data_dir.join(SETTINGS_FILE);
        let mut settings = read_settings(&settings_path)?;

        settings.app.user_id = self.user_id.clone();
        settings.app.daily_log_limit = Some(self.daily_log_limit);
        settings.logging.level = Some(self.log_level.clone());

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// The configured user, or an error telling the caller how to set one
    pub fn require_user(&self) -> Result<&str> {
        self.user_id
            .as_deref()
            .context("No user configured: pass --user or set WARDROBE_USER")
    }
}
