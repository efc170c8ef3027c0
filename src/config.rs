//! Configuration management for GrabTUI
//!
//! Handles config file loading/saving and session persistence.
//! Config is stored at ~/.config/grabtui/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default backend address when nothing is configured
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000/api/v1";

/// API version path segment every server URL must end with
const API_PREFIX: &str = "/api/v1";

/// Seconds between refreshes of the active download list
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;

/// Application configuration and persisted session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL, normalized to end in /api/v1
    pub server_url: String,
    /// Session token obtained from login, if any
    pub auth_token: Option<String>,
    /// Optional static API key some deployments require
    pub api_key: Option<String>,
    /// Seconds between download queue refreshes
    pub poll_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_url: DEFAULT_SERVER_URL.to_string(),
            auth_token: None,
            api_key: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl Config {
    /// Get config file path (~/.config/grabtui/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("grabtui").join("config.toml"))
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        let mut config: Config = Self::path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default();
        config.server_url = normalize_server_url(&config.server_url);
        config
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Replace the server URL, normalizing it first
    pub fn set_server_url(&mut self, url: &str) {
        self.server_url = normalize_server_url(url);
    }

    /// Whether a login token is present
    pub fn is_logged_in(&self) -> bool {
        self.auth_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Drop the session token (e.g. after the backend rejects it)
    pub fn clear_token(&mut self) {
        self.auth_token = None;
    }
}

/// Normalize a server URL so it always carries the API version segment.
///
/// Accepts bare hosts ("http://nas:3000"), hosts with trailing slashes, and
/// already-normalized URLs; empty input falls back to the default.
pub fn normalize_server_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_SERVER_URL.to_string();
    }
    if trimmed.ends_with(API_PREFIX) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, API_PREFIX)
    }
}
