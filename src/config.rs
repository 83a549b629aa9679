//! Configuration Management
//!
//! Handles persistent configuration storage for catadmin.

use crate::api::ApiConfig;
use crate::store::DEFAULT_PAGE_SIZE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Backend used when neither the CLI, the environment, nor the file names one
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Backend base URL
    #[serde(default)]
    pub base_url: Option<String>,
    /// Bearer token sent with every request
    #[serde(default)]
    pub token: Option<String>,
    /// Rows per page in the list view
    #[serde(default)]
    pub page_size: Option<usize>,
    /// Last viewed resource
    #[serde(default)]
    pub last_resource: Option<String>,
}

impl Config {
    /// Directory holding the config file and the log
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("catadmin"))
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from `path`; a missing or unreadable file yields the defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    /// Get effective base URL (CLI/env > config > default)
    pub fn effective_base_url(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Get effective token (CLI/env > config); blank values count as unset
    pub fn effective_token(&self, cli: Option<&str>) -> Option<String> {
        let non_blank = |t: &&str| !t.trim().is_empty();
        cli.filter(non_blank)
            .or_else(|| self.token.as_deref().filter(non_blank))
            .map(str::to_string)
    }

    /// Get effective page size (CLI > config > default), never zero
    pub fn effective_page_size(&self, cli: Option<usize>) -> usize {
        cli.or(self.page_size).unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }

    /// Connection settings for the API client
    pub fn api_config(&self, base_url: Option<&str>, token: Option<&str>) -> Result<ApiConfig> {
        let url = self.effective_base_url(base_url);
        ApiConfig::new(&url, self.effective_token(token))
            .with_context(|| format!("Invalid base URL '{}'", url))
    }

    /// Set last resource and save
    pub fn set_last_resource(&mut self, resource: &str) -> Result<()> {
        self.last_resource = Some(resource.to_string());
        self.save()
    }
}
