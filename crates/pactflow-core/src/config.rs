//! Client configuration management.
//!
//! A `Config` carries the broker base URL, the access token and an optional
//! request timeout. Values are resolved in this order:
//!
//! 1. Environment: `PACT_BROKER_BASE_URL`, `PACT_BROKER_TOKEN`,
//!    `PACT_BROKER_TIMEOUT_SECS`
//! 2. Config file at `~/.config/pactflow/config.json`
//! 3. Token only: the OS keychain entry for the base URL
//!
//! The access token is never written to the config file.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::TokenStore;

/// Application name used for the config directory path
const APP_NAME: &str = "pactflow";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const BASE_URL_ENV: &str = "PACT_BROKER_BASE_URL";
pub const TOKEN_ENV: &str = "PACT_BROKER_TOKEN";
pub const TIMEOUT_ENV: &str = "PACT_BROKER_TIMEOUT_SECS";

#[derive(Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub base_url: String,
    #[serde(skip)]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: Some(access_token.into()),
            timeout_secs: None,
        }
    }

    /// Load the config file, or defaults if there is none.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load a specific config file. A file that exists but does not parse
    /// is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Persist base URL and timeout. The token stays out of the file.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Build the effective configuration from file, environment and keychain.
    pub fn resolve() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env(|key| std::env::var(key).ok())?;

        if config.access_token.is_none() && !config.base_url.is_empty() {
            match TokenStore::get_token(&config.base_url) {
                Ok(token) => config.access_token = Some(token),
                Err(e) => debug!(error = %e, "No access token in keychain"),
            }
        }

        Ok(config)
    }

    /// Override fields with values from `lookup`, ignoring blank values.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(BASE_URL_ENV) {
            self.base_url = url;
        }
        if let Some(token) = get(TOKEN_ENV) {
            self.access_token = Some(token);
        }
        if let Some(timeout) = get(TIMEOUT_ENV) {
            let secs = timeout
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{} must be a number of seconds, got {:?}", TIMEOUT_ENV, timeout))?;
            self.timeout_secs = Some(secs);
        }
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}
