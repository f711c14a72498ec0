//! Configuration management for the pixel grid server.
//!
//! Handles loading and validating configuration from JSON files. The loaded
//! configuration is handed to the pipeline by value and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "/opt/pixel-grid/config.json";

/// Largest grid side we accept
pub const MAX_GRID_DIMENSION: u32 = 1024;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// How the grid is rendered in the HTTP response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Row-major `[y][x]` matrix of `[r, g, b]` triplets
    Direct,
    /// One comma-joined `#rrggbb` string per column, in wiring order
    #[default]
    SerpentineHex,
}

/// Target grid dimensions for one transformation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    pub width: u32,
    pub height: u32,
}

impl GridConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A grid with no cells; the pipeline short-circuits on it
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Display controller URL; empty disables forwarding
    #[serde(default)]
    pub endpoint_url: String,

    /// Number of LED columns
    #[serde(default = "default_grid_dimension")]
    pub grid_width: u32,

    /// Number of LED rows
    #[serde(default = "default_grid_dimension")]
    pub grid_height: u32,

    /// Response encoding
    #[serde(default)]
    pub output_mode: OutputMode,

    /// Web server port
    #[serde(default = "default_web_port")]
    pub web_port: u16,

    /// Maximum width or height of an uploaded image, in pixels
    #[serde(default = "default_max_image_dimension")]
    pub max_image_dimension: u32,

    /// Maximum accepted request body size, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,
}

fn default_grid_dimension() -> u32 {
    16
}

fn default_web_port() -> u16 {
    8888
}

fn default_max_image_dimension() -> u32 {
    4096
}

fn default_max_upload_bytes() -> usize {
    8 * 1024 * 1024
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint_url: String::new(),
            grid_width: default_grid_dimension(),
            grid_height: default_grid_dimension(),
            output_mode: OutputMode::default(),
            web_port: default_web_port(),
            max_image_dimension: default_max_image_dimension(),
            max_upload_bytes: default_max_upload_bytes(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width > MAX_GRID_DIMENSION || self.grid_height > MAX_GRID_DIMENSION {
            return Err(ConfigError::ValidationError(format!(
                "grid dimensions {}x{} exceed {}x{}",
                self.grid_width, self.grid_height, MAX_GRID_DIMENSION, MAX_GRID_DIMENSION
            )));
        }

        if self.grid().is_empty() {
            tracing::warn!(
                "Grid is {}x{}, every request will produce an empty grid",
                self.grid_width,
                self.grid_height
            );
        }

        if self.web_port == 0 {
            return Err(ConfigError::ValidationError(
                "web_port must be greater than 0".to_string(),
            ));
        }

        if self.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "max_image_dimension must be greater than 0".to_string(),
            ));
        }

        if self.max_upload_bytes < 1024 {
            return Err(ConfigError::ValidationError(
                "max_upload_bytes must be at least 1024".to_string(),
            ));
        }

        if self.has_endpoint_url() {
            let url = reqwest::Url::parse(self.endpoint_url.trim()).map_err(|e| {
                ConfigError::ValidationError(format!(
                    "endpoint_url '{}' is not a valid URL: {}",
                    self.endpoint_url, e
                ))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::ValidationError(format!(
                    "endpoint_url must use http or https, got '{}'",
                    url.scheme()
                )));
            }
        }

        Ok(())
    }

    /// Grid dimensions as a standalone value
    pub fn grid(&self) -> GridConfig {
        GridConfig::new(self.grid_width, self.grid_height)
    }

    /// Check if a display controller URL is configured
    pub fn has_endpoint_url(&self) -> bool {
        !self.endpoint_url.trim().is_empty()
    }

    /// Configured display controller URL, if any
    pub fn endpoint(&self) -> Option<&str> {
        self.has_endpoint_url().then(|| self.endpoint_url.trim())
    }
}
