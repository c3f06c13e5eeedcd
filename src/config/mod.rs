//! Configuration management for quizdojo

pub mod progress;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::theme::Theme;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Selected theme name
    pub theme: String,

    /// Custom theme overrides (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_theme: Option<Theme>,

    /// Time limit used when none is given on the command line (0 = unlimited)
    pub default_time_limit_minutes: u32,

    /// Shuffle answer options when loading a quiz
    pub shuffle_options: bool,

    /// Vim mode enabled (j/k move the highlight)
    pub vim_mode: bool,

    /// Append finished quizzes to the progress history
    pub record_history: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "Tokyo Night".to_string(),
            custom_theme: None,
            default_time_limit_minutes: 0,
            shuffle_options: false,
            vim_mode: true,
            record_history: true,
        }
    }
}

impl Config {
    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        serde_json::from_str(&contents).with_context(|| "Failed to parse config.json")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "quizdojo").context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "quizdojo").context("Failed to determine data directory")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Get the log file path
    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("quizdojo.log"))
    }

    /// Resolve the time limit in seconds, preferring an explicit value in minutes
    pub fn time_limit_secs(&self, minutes: Option<u32>) -> u32 {
        minutes.unwrap_or(self.default_time_limit_minutes).saturating_mul(60)
    }

    /// Get the active theme
    ///
    /// A custom theme wins over the named one; unknown names fall back to Tokyo Night.
    pub fn active_theme(&self) -> Theme {
        if let Some(ref custom) = self.custom_theme {
            return custom.clone();
        }
        Theme::named(&self.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %self.theme, "unknown theme, using Tokyo Night");
            Theme::tokyo_night()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_tokyo_night_theme() {
        let config = Config::default();
        assert_eq!(config.theme, "Tokyo Night");
    }

    #[test]
    fn default_config_has_no_time_limit() {
        let config = Config::default();
        assert_eq!(config.time_limit_secs(None), 0);
        assert!(config.record_history);
    }

    #[test]
    fn explicit_minutes_override_default() {
        let config = Config { default_time_limit_minutes: 10, ..Config::default() };
        assert_eq!(config.time_limit_secs(None), 600);
        assert_eq!(config.time_limit_secs(Some(2)), 120);
        assert_eq!(config.time_limit_secs(Some(0)), 0);
    }

    #[test]
    fn config_deserializes_partial_json() {
        let json = r#"{"theme":"Custom","default_time_limit_minutes":5}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.theme, "Custom");
        assert_eq!(config.default_time_limit_minutes, 5);
        assert!(config.vim_mode);
    }

    #[test]
    fn active_theme_follows_name_and_custom_override() {
        let config = Config { theme: "tokyo night".to_string(), ..Config::default() };
        assert_eq!(config.active_theme().name, "Tokyo Night");

        let config = Config { theme: "Nonexistent".to_string(), ..Config::default() };
        assert_eq!(config.active_theme().name, "Tokyo Night");

        let custom = Theme { name: "Mine".to_string(), ..Theme::tokyo_night() };
        let config = Config { custom_theme: Some(custom), ..Config::default() };
        assert_eq!(config.active_theme().name, "Mine");
    }

    #[test]
    fn config_round_trips_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config { shuffle_options: true, ..Config::default() };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.shuffle_options);
        assert_eq!(loaded.theme, "Tokyo Night");
    }
}
