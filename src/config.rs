//! Application configuration.
//!
//! Loaded from an optional JSON file next to the binary; every field has
//! a default so a missing or partial file still yields a usable config.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE: &str = "node_preview_panels.json";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the host server that serves previews and accepts uploads.
    #[serde(default = "default_server_base")]
    pub server_base: String,
    /// Path of the upload endpoint, relative to `server_base`.
    #[serde(default = "default_upload_path")]
    pub upload_path: String,
}

fn default_server_base() -> String {
    "http://127.0.0.1:8188".to_string()
}

fn default_upload_path() -> String {
    "/upload/image".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_base: default_server_base(),
            upload_path: default_upload_path(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load the config file if it exists; fall back to defaults otherwise.
    /// A malformed file is logged and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config file: {e:#}");
                Self::default()
            }
        }
    }

    /// Resolve a (possibly relative) resource URL against the server base.
    pub fn absolute_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        format!(
            "{}/{}",
            self.server_base.trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }

    pub fn upload_url(&self) -> String {
        self.absolute_url(&self.upload_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_url_joins_relative_paths() {
        let config = AppConfig {
            server_base: "http://localhost:8188".into(),
            ..Default::default()
        };
        assert_eq!(
            config.absolute_url("/view?a=1"),
            "http://localhost:8188/view?a=1"
        );
    }

    #[test]
    fn absolute_url_tolerates_trailing_slash_in_base() {
        let config = AppConfig {
            server_base: "http://localhost:8188/".into(),
            ..Default::default()
        };
        assert_eq!(
            config.absolute_url("view?a=1"),
            "http://localhost:8188/view?a=1"
        );
    }

    #[test]
    fn absolute_url_passes_through_full_urls() {
        let config = AppConfig::default();
        assert_eq!(
            config.absolute_url("https://example.com/x.png"),
            "https://example.com/x.png"
        );
    }

    #[test]
    fn partial_config_file_fills_in_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"server_base":"http://host:9000"}"#)
            .expect("partial config should parse");
        assert_eq!(config.server_base, "http://host:9000");
        assert_eq!(config.upload_path, "/upload/image");
    }
}
