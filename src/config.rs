//! Configuration management for the executives TUI.
//!
//! Handles loading configuration from JSONC files.
//! Manages the API endpoint, network timings, and log output.

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration structure.
///
/// Contains the API endpoint, retry timings, and logging preferences.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Executives endpoint; the session is appended as a query parameter
    pub api_url: String,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Delay before an automatic retry, in milliseconds
    pub retry_delay_ms: u64,
    /// Number of automatic retries after the first failed attempt
    pub max_auto_retries: u32,
    /// Image shown when an executive's avatar cannot be loaded
    pub placeholder_image_url: String,
    /// Log file path (logging is off unless this or RUST_LOG is set)
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080/api/executives".to_string(),
            request_timeout_ms: 10_000,
            retry_delay_ms: 2_000,
            max_auto_retries: 2,
            placeholder_image_url: "https://via.placeholder.com/150".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from file.
    ///
    /// # Arguments
    /// * `path` - Optional path to config file. If None, uses default location.
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    ///
    /// # Details
    /// Searches for config file in:
    /// 1. Provided path (if given)
    /// 2. `$XDG_CONFIG_HOME/exec-tui/config.jsonc`
    /// 3. `~/.config/exec-tui/config.jsonc`
    ///
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            Self::default_config_path()?
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = serde_json::from_str(&strip_line_comments(&content))
            .with_context(|| format!("Failed to deserialize config: {}", config_path.display()))?;

        Ok(config)
    }

    /// Get default configuration file path.
    ///
    /// # Returns
    /// * `Result<PathBuf>` - Path to config file or error
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir =
            config_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine config directory"))?;
        Ok(config_dir.join("exec-tui").join("config.jsonc"))
    }

    /// Per-request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Automatic retry delay as a `Duration`.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Strip `//` comments that are not inside a string literal.
fn strip_line_comments(content: &str) -> String {
    content
        .lines()
        .map(strip_comment)
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut escaped = false;
    for (i, &byte) in bytes.iter().enumerate() {
        match byte {
            _ if escaped => escaped = false,
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'/' if !in_string && bytes.get(i + 1) == Some(&b'/') => {
                return line[..i].trim_end();
            }
            _ => {}
        }
    }
    line
}
