//! Per-connection error kinds
//!
//! `FileNotFound` is answered with a 404 and goes no further. Every other
//! kind is answered with a 500 and then returned to the server loop.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::http::ParseError;

#[derive(Debug)]
pub enum HandleError {
    /// Request bytes are not valid UTF-8
    Decode(std::str::Utf8Error),
    /// Request line or header line could not be split
    MalformedRequest(ParseError),
    /// Resolved resource has no extension to pick a content type from
    MissingExtension(String),
    /// Extension is not in the MIME table
    UnsupportedMediaType(String),
    /// No file at the resolved path
    FileNotFound(PathBuf),
    /// Socket or filesystem failure
    Io(io::Error),
    /// Read or write did not finish within the configured limit
    Timeout(&'static str),
}

impl fmt::Display for HandleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "request is not valid UTF-8: {e}"),
            Self::MalformedRequest(e) => write!(f, "malformed request: {e}"),
            Self::MissingExtension(resource) => {
                write!(f, "no file extension in resource {resource:?}")
            }
            Self::UnsupportedMediaType(ext) => write!(f, "no content type for extension {ext:?}"),
            Self::FileNotFound(path) => write!(f, "file not found: {}", path.display()),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Timeout(op) => write!(f, "connection {op} timed out"),
        }
    }
}

impl std::error::Error for HandleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            Self::MalformedRequest(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for HandleError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ParseError> for HandleError {
    fn from(err: ParseError) -> Self {
        Self::MalformedRequest(err)
    }
}

impl From<std::str::Utf8Error> for HandleError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::Decode(err)
    }
}
