//! HTTP response building module
//!
//! Provides builders for each status the server answers with. Responses are
//! written with bare LF line endings:
//!
//! ```text
//! HTTP/1.1 200 OK\n
//! Content-Type: text/css\n
//! \n
//! <body>\n
//! ```

use super::status::StatusCode;

/// A fully buffered response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    headers: Vec<(&'static str, String)>,
    body: Option<String>,
}

impl Response {
    pub const fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Body size in bytes, 0 when there is no body
    pub fn body_len(&self) -> usize {
        self.body.as_ref().map_or(0, String::len)
    }

    /// Serialize status line, headers and body
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = format!("HTTP/1.1 {}\n", self.status);
        for (name, value) in &self.headers {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
        if let Some(body) = &self.body {
            out.push('\n');
            out.push_str(body);
            out.push('\n');
        }
        out.into_bytes()
    }
}

/// Build 200 OK response carrying a file
pub fn build_200_response(content_type: &str, contents: String) -> Response {
    Response::new(StatusCode::Ok)
        .with_header("Content-Type", content_type)
        .with_body(contents)
}

/// Build 301 redirect to the resource with a trailing slash
pub fn build_301_response(resource: &str) -> Response {
    Response::new(StatusCode::MovedPermanently).with_header("Location", format!("{resource}/"))
}

/// Build 404 Not Found response naming the missing path
pub fn build_404_response(missing: &str) -> Response {
    Response::new(StatusCode::NotFound).with_body(format!(
        "<html><h1>404 Not Found</h1><p>Cannot find {missing}</p></html>"
    ))
}

/// Build 405 Method Not Allowed response
pub const fn build_405_response() -> Response {
    Response::new(StatusCode::MethodNotAllowed)
}

/// Build 500 Internal Server Error response
pub const fn build_500_response() -> Response {
    Response::new(StatusCode::InternalServerError)
}
