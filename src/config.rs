//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every section and field is optional; missing values take the defaults
//! below.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::control::mapper::{ThrottleRelease, DEFAULT_SPAN};
use crate::error::{Result, TouchPilotError};
use crate::pad::Rect;
use crate::transport::protocol::DEFAULT_ENDPOINT;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub pads: PadsConfig,

    #[serde(default)]
    pub mapping: MappingConfig,

    #[serde(default)]
    pub touchscreen: TouchscreenConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Vehicle endpoint configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TransportConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,
}

/// Pad rectangles in touchscreen units
#[derive(Debug, Deserialize, Clone)]
pub struct PadsConfig {
    #[serde(default = "default_left_pad")]
    pub left: Rect,

    #[serde(default = "default_right_pad")]
    pub right: Rect,
}

/// Finger-to-command transform configuration
#[derive(Debug, Deserialize, Clone)]
pub struct MappingConfig {
    #[serde(default = "default_span")]
    pub vertical_span: f64,

    #[serde(default = "default_span")]
    pub horizontal_span: f64,

    #[serde(default)]
    pub throttle_release: ThrottleRelease,
}

/// Touchscreen device configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TouchscreenConfig {
    /// Empty means auto-detect
    #[serde(default)]
    pub device_path: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Empty means console only
    #[serde(default)]
    pub log_dir: String,
}

// Default value functions
fn default_base_url() -> String { "http://192.168.4.1:5000".to_string() }
fn default_endpoint() -> String { DEFAULT_ENDPOINT.to_string() }
fn default_timeout_ms() -> u64 { 500 }
fn default_heartbeat_interval_ms() -> u64 { 1000 }

fn default_left_pad() -> Rect { Rect::new(0.0, 0.0, 300.0, 300.0) }
fn default_right_pad() -> Rect { Rect::new(500.0, 0.0, 300.0, 300.0) }

fn default_span() -> f64 { DEFAULT_SPAN }

fn default_log_level() -> String { "info".to_string() }

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
        }
    }
}

impl Default for PadsConfig {
    fn default() -> Self {
        Self {
            left: default_left_pad(),
            right: default_right_pad(),
        }
    }
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            vertical_span: default_span(),
            horizontal_span: default_span(),
            throttle_release: ThrottleRelease::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: String::new(),
        }
    }
}

impl TransportConfig {
    /// Full URL messages are posted to.
    ///
    /// # Examples
    ///
    /// ```
    /// use touch_pilot::config::TransportConfig;
    ///
    /// let config = TransportConfig {
    ///     base_url: "http://10.0.0.1:5000/".to_string(),
    ///     ..TransportConfig::default()
    /// };
    /// assert_eq!(config.url(), "http://10.0.0.1:5000/api");
    /// ```
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.endpoint)
    }
}

fn invalid(message: impl std::fmt::Display) -> TouchPilotError {
    TouchPilotError::Config(toml::de::Error::custom(message))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use touch_pilot::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns `Config` if parsing or validation fails.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        // Transport
        let base_url = &self.transport.base_url;
        // The HTTP client is built without a TLS backend
        if !base_url.starts_with("http://") {
            return Err(invalid("base_url must start with http://"));
        }

        if !self.transport.endpoint.starts_with('/') {
            return Err(invalid("endpoint must start with '/'"));
        }

        if self.transport.timeout_ms == 0 || self.transport.timeout_ms > 10000 {
            return Err(invalid("timeout_ms must be between 1 and 10000"));
        }

        if self.transport.heartbeat_interval_ms < 100 || self.transport.heartbeat_interval_ms > 60000 {
            return Err(invalid("heartbeat_interval_ms must be between 100 and 60000"));
        }

        // Pads
        for (name, rect) in [("left", &self.pads.left), ("right", &self.pads.right)] {
            let finite = [rect.left, rect.top, rect.width, rect.height]
                .iter()
                .all(|v| v.is_finite());
            if !finite {
                return Err(invalid(format!("{} pad coordinates must be finite", name)));
            }
            if rect.width <= 0.0 || rect.height <= 0.0 {
                return Err(invalid(format!("{} pad width and height must be greater than 0", name)));
            }
        }

        if self.pads.left.intersects(&self.pads.right) {
            return Err(invalid("left and right pads must not overlap"));
        }

        // Mapping spans
        for (name, value) in [
            ("vertical_span", self.mapping.vertical_span),
            ("horizontal_span", self.mapping.horizontal_span),
        ] {
            if !(500.0..=2000.0).contains(&value) {
                return Err(invalid(format!("{} must be between 500 and 2000", name)));
            }
        }

        // Logging
        if !["trace", "debug", "info", "warn", "error"].contains(&self.logging.level.as_str()) {
            return Err(invalid("log level must be one of: trace, debug, info, warn, error"));
        }

        Ok(())
    }
}
