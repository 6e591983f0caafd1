// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory to serve (defaults to the executable's directory)
    #[serde(default)]
    pub root: Option<String>,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format (transfer, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "transfer".to_string()
}

/// Per-request serving configuration, built once at startup and shared
/// with every connection task.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Absolute, lexically normalized root directory
    pub root: PathBuf,
    /// Root with symlinks resolved, used for the post-lookup ancestry check
    pub canonical_root: PathBuf,
    pub access_log: bool,
    pub access_log_format: String,
}

impl ServeConfig {
    pub fn new(root: PathBuf, logging: &LoggingConfig) -> std::io::Result<Self> {
        let canonical_root = root.canonicalize()?;
        Ok(Self {
            root,
            canonical_root,
            access_log: logging.access_log,
            access_log_format: logging.access_log_format.clone(),
        })
    }
}
