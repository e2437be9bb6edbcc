//! Minimal static file server.
//!
//! Serves HTML and CSS from a serve root over a simplified, LF-delimited
//! HTTP/1.1, one connection at a time.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

#[cfg(test)]
mod test_support;
