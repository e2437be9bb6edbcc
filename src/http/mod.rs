//! HTTP protocol layer module
//!
//! Request parsing, status codes, response builders and the MIME table.
//! Nothing in here touches sockets or the filesystem.

pub mod mime;
pub mod request;
pub mod response;
pub mod status;

// Re-export commonly used types
pub use mime::MimeTable;
pub use request::{parse_request, ParseError, Request};
pub use response::{
    build_200_response, build_301_response, build_404_response, build_405_response,
    build_500_response, Response,
};
pub use status::StatusCode;
