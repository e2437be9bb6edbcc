// Serve context module
// Read-only per-process settings handed to the request handler

use std::path::PathBuf;
use std::time::Duration;

use super::types::Config;
use crate::http::MimeTable;

/// Everything the handler needs to answer a connection
#[derive(Debug, Clone)]
pub struct ServeContext {
    pub root: PathBuf,
    pub index_file: String,
    pub read_buffer_size: usize,
    pub mime: MimeTable,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
    pub access_log: bool,
    pub access_log_format: String,
    pub show_headers: bool,
}

impl ServeContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            root: PathBuf::from(&config.serve.root),
            index_file: config.serve.index_file.clone(),
            read_buffer_size: config.serve.read_buffer_size,
            mime: MimeTable::with_extras(&config.http.mime_types),
            read_timeout: seconds(config.performance.read_timeout),
            write_timeout: seconds(config.performance.write_timeout),
            access_log: config.logging.access_log,
            access_log_format: config.logging.access_log_format.clone(),
            show_headers: config.logging.show_headers,
        }
    }

    /// Context serving `root` with default settings and logging off
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            index_file: "index.html".to_string(),
            read_buffer_size: 1024,
            mime: MimeTable::default(),
            read_timeout: None,
            write_timeout: None,
            access_log: false,
            access_log_format: "common".to_string(),
            show_headers: false,
        }
    }
}

const fn seconds(value: u64) -> Option<Duration> {
    if value == 0 {
        None
    } else {
        Some(Duration::from_secs(value))
    }
}
