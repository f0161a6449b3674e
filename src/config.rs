use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::theme::Theme;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub server_url: Option<String>,
    pub theme: Option<Theme>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            server_url: None,
            theme: None,
        }
    }

    /// Reads the file at `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Persists just the theme, keeping whatever else the file holds.
    pub fn save_theme(path: &Path, theme: Theme) -> Result<()> {
        let mut config = Self::load(path).unwrap_or_else(|_| Self::new());
        config.theme = Some(theme);
        config.save(path)
    }

    pub fn server_url(&self) -> String {
        self.server_url
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }

    pub fn theme(&self) -> Theme {
        self.theme.unwrap_or_default()
    }

    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("adtu-campus-chat").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = Config::new();
        assert_eq!(config.server_url(), DEFAULT_SERVER_URL);
        assert_eq!(config.theme(), Theme::Dark);
    }

    #[test]
    fn test_partial_file_parses() {
        let config: Config = serde_json::from_str(r#"{"theme":"light","server_url":null}"#).unwrap();
        assert_eq!(config.theme(), Theme::Light);
        assert_eq!(config.server_url(), DEFAULT_SERVER_URL);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.theme(), Theme::Dark);
        assert_eq!(config.server_url(), DEFAULT_SERVER_URL);
    }

    #[test]
    fn test_save_theme_keeps_other_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let config = Config {
            server_url: Some("http://campus:5000".to_string()),
            theme: None,
        };
        config.save(&path).unwrap();

        Config::save_theme(&path, Theme::Light).unwrap();

        let reread = Config::load(&path).unwrap();
        assert_eq!(reread.theme(), Theme::Light);
        assert_eq!(reread.server_url(), "http://campus:5000");
    }
}
