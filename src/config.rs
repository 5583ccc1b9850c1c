// src/config.rs

//! Configuration for the `render-changes` filter.
//!
//! The structs deserialize from a JSON file named by the
//! `RENDER_CHANGES_CONFIG` environment variable. Every section carries
//! `#[serde(default)]`, so a file only needs the settings it changes; without
//! a file the defaults below apply.

use anyhow::{Context, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "RENDER_CHANGES_CONFIG";

/// Process-wide configuration, loaded on first use.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load);

// --- Top-Level Configuration Structure ---

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// How input is read and handed to the decoder.
    pub input: InputConfig,
    /// Renderer behaviour.
    pub render: RenderConfig,
}

impl Config {
    /// Reads the file named by `RENDER_CHANGES_CONFIG`, falling back to the
    /// defaults when the variable is unset or the file cannot be used.
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(CONFIG_PATH_ENV) else {
            return Config::default();
        };
        match Config::from_file(Path::new(&path)) {
            Ok(config) => {
                info!("Configuration loaded from {:?}", path);
                config
            }
            Err(e) => {
                warn!("{:#}. Using default configuration.", e);
                Config::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Config::from_json(&text).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse configuration JSON")
    }
}

// --- Input Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Bytes requested from the input descriptor per read.
    pub block_size: usize,
    /// How long the reader waits for the descriptor to become readable before
    /// checking whether it has been asked to stop.
    pub poll_interval_ms: u64,
    /// Filled blocks that may wait for the decoder while the reader fills the
    /// next one.
    pub queued_blocks: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            block_size: 1 << 20,
            poll_interval_ms: 100,
            queued_blocks: 1,
        }
    }
}

// --- Render Configuration ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Accumulate deltas as scaled 64-bit integers instead of `f64`.
    pub fixed_point: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig { fixed_point: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use test_log::test;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.input.block_size, 1_048_576);
        assert_eq!(config.input.poll_interval_ms, 100);
        assert_eq!(config.input.queued_blocks, 1);
        assert!(config.render.fixed_point);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = Config::from_json(r#"{"render": {"fixed_point": false}}"#).unwrap();
        assert!(!config.render.fixed_point);
        assert_eq!(config.input, InputConfig::default());

        let config = Config::from_json(r#"{"input": {"block_size": 4096}}"#).unwrap();
        assert_eq!(config.input.block_size, 4096);
        assert_eq!(config.input.queued_blocks, 1);
        assert_eq!(config.render, RenderConfig::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Config::from_json(r#"{"input": {"block_size": "big"}}"#).is_err());
        assert!(Config::from_json("{").is_err());
    }

    #[test]
    fn from_file_reads_json() {
        let path = std::env::temp_dir().join(format!(
            "render-changes-config-{}.json",
            std::process::id()
        ));
        {
            let mut file = std::fs::File::create(&path).unwrap();
            write!(file, r#"{{"input": {{"poll_interval_ms": 5}}}}"#).unwrap();
        }
        let config = Config::from_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.unwrap().input.poll_interval_ms, 5);
    }

    #[test]
    fn missing_file_is_an_error() {
        let error = Config::from_file(Path::new("/nonexistent/render-changes.json")).unwrap_err();
        assert!(format!("{:#}", error).contains("Failed to read config file"));
    }
}
