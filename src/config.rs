//! Application configuration management.
//!
//! Configuration is stored at `~/.config/lightbox/config.json`; the same
//! directory holds the persisted bearer token. The API base URL resolves
//! from the `LIGHTBOX_API_URL` environment variable, then the config file,
//! then a build-mode default.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config directory paths
const APP_NAME: &str = "lightbox";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Port the backend listens on during development
const DEV_API_PORT: u16 = 5000;

/// Environment variable overriding the API base URL
const API_URL_ENV: &str = "LIGHTBOX_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub server_url: Option<String>,
    pub last_username: Option<String>,
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
        Ok(Self::data_dir()?.join(CONFIG_FILE))
    }

    /// Directory holding the config file and the persisted token
    pub fn data_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME))
    }

    /// Resolve the API base URL.
    ///
    /// Debug builds fall back to a local development backend; release builds
    /// must be pointed at a server explicitly (the deployed frontend reaches
    /// the API through a reverse proxy, which a terminal client cannot
    /// assume).
    pub fn api_base_url(&self) -> Result<String> {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                return Ok(url.trim().to_string());
            }
        }

        if let Some(ref url) = self.server_url {
            if !url.trim().is_empty() {
                return Ok(url.trim().to_string());
            }
        }

        if cfg!(debug_assertions) {
            Ok(format!("http://localhost:{}/api", DEV_API_PORT))
        } else {
            Err(anyhow::anyhow!(
                "No server configured. Set server_url in {} or export {}",
                Self::config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| "the config file".to_string()),
                API_URL_ENV
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_url_resolution() {
        // Single test body: the env var is process-global, so the cases run
        // sequentially here instead of racing across test threads.
        std::env::remove_var(API_URL_ENV);

        let configured = Config {
            server_url: Some("https://photos.example.com/api".to_string()),
            last_username: None,
        };
        assert_eq!(
            configured.api_base_url().unwrap(),
            "https://photos.example.com/api"
        );

        let blank = Config {
            server_url: Some("   ".to_string()),
            last_username: None,
        };
        if cfg!(debug_assertions) {
            assert_eq!(blank.api_base_url().unwrap(), "http://localhost:5000/api");
        } else {
            assert!(blank.api_base_url().is_err());
        }

        std::env::set_var(API_URL_ENV, "http://10.0.0.5:5000/api");
        assert_eq!(
            configured.api_base_url().unwrap(),
            "http://10.0.0.5:5000/api"
        );
        std::env::remove_var(API_URL_ENV);
    }
}
