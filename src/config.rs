//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base URL, language pair, and last used email.
//!
//! Configuration is stored at `~/.config/lingocache/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "lingocache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub native_language: Option<String>,
    pub target_language: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_is_empty() {
        let config = Config::default();
        assert!(config.api_base_url.is_none());
        assert!(config.last_email.is_none());
    }

    #[test]
    fn test_config_roundtrip_json() {
        let config = Config {
            api_base_url: Some("https://api.example.com".to_string()),
            native_language: Some("en".to_string()),
            target_language: Some("no".to_string()),
            last_email: None,
        };
        let json = serde_json::to_string(&config).expect("Failed to serialize config");
        let back: Config = serde_json::from_str(&json).expect("Failed to parse config");
        assert_eq!(back.api_base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(back.target_language.as_deref(), Some("no"));
    }
}
