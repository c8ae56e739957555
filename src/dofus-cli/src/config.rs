//! Configuration management for dofus CLI

use anyhow::{bail, Context, Result};
use dofus::session::{Session, User};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Item search API used when none is configured
pub const DEFAULT_API_URL: &str = "https://api.dofusdu.de/dofus3/v1/fr";

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Signed-in user
    pub user: Option<User>,

    /// Item search API base URL
    pub api_url: Option<String>,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("dofus");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }

    /// Current session, if a user is configured
    pub fn session(&self) -> Option<Session> {
        self.user.clone().map(Session::new)
    }

    /// Session for commands that persist user data
    pub fn require_session(&self) -> Result<Session> {
        match self.session() {
            Some(session) => Ok(session),
            None => bail!("Unauthorized: sign in first with `dofus configure --user-id <ID>`"),
        }
    }

    /// API base URL: the override if given, then the configured one, then the default
    pub fn api_url(&self, override_url: Option<&str>) -> String {
        override_url
            .or(self.api_url.as_deref())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_exists() {
        let result = Config::config_path();
        assert!(result.is_ok());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.require_session().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            user: Some(User {
                id: "u-1".to_string(),
                name: Some("Ecaflip".to_string()),
                email: None,
            }),
            api_url: Some("http://localhost:3000/".to_string()),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.require_session().unwrap().namespace(), "u-1");
        assert_eq!(loaded.api_url(None), "http://localhost:3000");
    }

    #[test]
    fn test_api_url_precedence() {
        let config = Config::default();
        assert_eq!(config.api_url(None), DEFAULT_API_URL);
        assert_eq!(config.api_url(Some("http://x")), "http://x");
    }
}
