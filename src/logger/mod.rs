//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Severity threshold, messages above the configured level are dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    /// Parse a level name, unknown names fall back to `Info`
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "error" => Self::Error,
            "warn" | "warning" => Self::Warn,
            "debug" | "trace" => Self::Debug,
            _ => Self::Info,
        }
    }
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        LogLevel::parse(&config.logging.level),
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn enabled(level: LogLevel) -> bool {
    writer::get().map_or(LogLevel::Info, writer::LogWriter::level) >= level
}

/// Write to info/access log
fn write_info(message: &str) {
    if !enabled(LogLevel::Info) {
        return;
    }
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

fn write_debug(message: &str) {
    if !enabled(LogLevel::Debug) {
        return;
    }
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(level: LogLevel, message: &str) {
    if !enabled(level) {
        return;
    }
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Server started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Serving: {}", config.serve.root));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("Connections are handled one at a time");
    write_info("======================================\n");
}

pub fn log_effective_config(rendered: &str) {
    write_debug("[CONFIG] Effective configuration:");
    write_debug(rendered);
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(peer_addr: &SocketAddr, err: &impl std::fmt::Display) {
    write_error(
        LogLevel::Error,
        &format!("[ERROR] Failed to serve connection from {peer_addr}: {err}"),
    );
}

pub fn log_request(method: &str, resource: &str, body_len: usize) {
    write_debug(&format!("[Request] {method} {resource} ({body_len} body bytes)"));
}

pub fn log_headers<'a>(headers: impl IntoIterator<Item = (&'a String, &'a String)>) {
    for line in header_lines(headers) {
        write_info(&line);
    }
}

/// One `[Headers]` line per header, sorted by name
fn header_lines<'a>(headers: impl IntoIterator<Item = (&'a String, &'a String)>) -> Vec<String> {
    let mut headers: Vec<_> = headers.into_iter().collect();
    headers.sort_unstable();
    headers
        .into_iter()
        .map(|(name, value)| format!("[Headers] {name}: {value}"))
        .collect()
}

pub fn log_error(message: &str) {
    write_error(LogLevel::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(LogLevel::Warn, &format!("[WARN] {message}"));
}

pub fn log_shutdown() {
    write_info("[SHUTDOWN] Server stopped accepting connections");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}
