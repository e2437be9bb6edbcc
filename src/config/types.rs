// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub serve: ServeConfig,
    #[serde(default)]
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Listening endpoint
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where files are served from and how much of a request is read
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServeConfig {
    /// Serve root, relative to the working directory unless absolute
    pub root: String,
    /// Default document for paths ending in `/`
    pub index_file: String,
    /// Bytes read from a connection before parsing
    pub read_buffer_size: usize,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HttpConfig {
    /// Extra extension -> content type entries, merged over the built-in table
    #[serde(default)]
    pub mime_types: BTreeMap<String, String>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    pub show_headers: bool,
    /// Access log format (combined, common, json, or custom pattern)
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
    "common".to_string()
}

/// Per-connection I/O limits in seconds, 0 disables the limit
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PerformanceConfig {
    pub read_timeout: u64,
    pub write_timeout: u64,
}
