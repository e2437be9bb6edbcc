//! Request parsing module
//!
//! Parses the LF-delimited request text read from a connection:
//!
//! ```text
//! GET /style.css HTTP/1.1\n
//! Host: localhost:8080\n
//! \n
//! (body, ignored)
//! ```

use std::collections::HashMap;
use std::fmt;

/// A parsed request. Built once per connection and never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    resource: String,
    headers: HashMap<String, String>,
    body: String,
}

/// Errors that can occur while parsing a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Request line is not exactly `METHOD RESOURCE VERSION`
    InvalidRequestLine(String),
    /// Header line without a `:` separator
    InvalidHeader(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequestLine(line) => write!(f, "Invalid request line: {line:?}"),
            Self::InvalidHeader(line) => write!(f, "Invalid header: {line:?}"),
        }
    }
}

impl std::error::Error for ParseError {}

impl Request {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Header lookup, case-insensitive on the name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Parse request text into method, resource, headers and body.
///
/// The request line must split on single spaces into exactly three fields;
/// the protocol version is discarded. Lines up to the first blank line are
/// headers, split on their first colon. The blank line and everything after
/// it is the body.
pub fn parse_request(raw: &str) -> Result<Request, ParseError> {
    let mut lines = raw.split('\n');
    let request_line = lines.next().unwrap_or_default();

    let fields: Vec<&str> = request_line.split(' ').collect();
    let &[method, resource, _version] = fields.as_slice() else {
        return Err(ParseError::InvalidRequestLine(request_line.to_string()));
    };
    if method.is_empty() || resource.is_empty() {
        return Err(ParseError::InvalidRequestLine(request_line.to_string()));
    }

    let mut headers = HashMap::new();
    let mut body_lines = Vec::new();
    let mut in_body = false;

    for line in lines {
        if line.trim().is_empty() {
            in_body = true;
        }
        if in_body {
            body_lines.push(line);
            continue;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| ParseError::InvalidHeader(line.to_string()))?;
        headers.insert(name.trim().to_string(), value.trim().to_string());
    }

    Ok(Request {
        method: method.to_string(),
        resource: resource.to_string(),
        headers,
        body: body_lines.join("\n"),
    })
}
