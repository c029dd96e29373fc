//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! portal credentials, dataset locations, the UI language and the last
//! selected district.
//!
//! Configuration is stored at `~/.config/nregadash/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::credentials::CredentialStore;
use crate::i18n::Language;

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "nregadash";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Metric store file name inside the cache directory
const DATABASE_FILE: &str = "data_cache.db";

/// Environment variable overriding the portal API key
pub const API_KEY_ENV: &str = "DATA_GOV_API_KEY";

/// Environment variable overriding the offline dataset path
pub const OFFLINE_DATA_ENV: &str = "NREGADASH_OFFLINE_DATA";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub offline_data_path: Option<PathBuf>,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub last_region: Option<String>,
    #[serde(default)]
    pub last_sub_region: Option<String>,
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

    pub fn database_path(&self) -> Result<PathBuf> {
        Ok(self.cache_dir()?.join(DATABASE_FILE))
    }

    /// API key from the environment, then the config file, then the OS
    /// keychain.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
            .or_else(CredentialStore::get_api_key)
    }

    /// Offline dataset path from the environment or config, if set.
    pub fn resolve_offline_path(&self) -> Option<PathBuf> {
        std::env::var_os(OFFLINE_DATA_ENV)
            .map(PathBuf::from)
            .or_else(|| self.offline_data_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"language": "hindi"}"#).unwrap();
        assert_eq!(config.language, Language::Hindi);
        assert!(config.api_key.is_none());
        assert!(config.last_region.is_none());
    }

    #[test]
    fn test_round_trip() {
        let config = Config {
            resource_id: Some("abc".to_string()),
            last_region: Some("Bihar".to_string()),
            last_sub_region: Some("Patna".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.resource_id.as_deref(), Some("abc"));
        assert_eq!(parsed.last_sub_region.as_deref(), Some("Patna"));
        assert_eq!(parsed.language, Language::English);
    }
}
