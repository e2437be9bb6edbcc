//! Request routing dispatch module
//!
//! Picks the response for a parsed request: method check, then the
//! directory redirect, then the file lookup.

use super::error::HandleError;
use super::static_files;
use crate::config::ServeContext;
use crate::http::{self, Request, Response};

/// Routing decision for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Anything other than `GET`
    MethodNotAllowed,
    /// Directory named without its trailing slash
    AddTrailingSlash,
    /// File, or directory index when the resource ends in `/`
    ServeFile,
}

/// Apply the routing rules in order, first match wins
pub fn route(request: &Request) -> Route {
    let resource = request.resource();
    if request.method() != "GET" {
        Route::MethodNotAllowed
    } else if !(static_files::has_trailing_slash(resource)
        || static_files::has_file_extension(resource))
    {
        Route::AddTrailingSlash
    } else {
        Route::ServeFile
    }
}

/// Build the response for a request
pub async fn respond(request: &Request, ctx: &ServeContext) -> Result<Response, HandleError> {
    match route(request) {
        Route::MethodNotAllowed => Ok(http::build_405_response()),
        Route::AddTrailingSlash => Ok(http::build_301_response(request.resource())),
        Route::ServeFile => serve_file(request.resource(), ctx).await,
    }
}

async fn serve_file(resource: &str, ctx: &ServeContext) -> Result<Response, HandleError> {
    let (contents, extension) = static_files::read_file(ctx, resource).await?;
    let content_type = ctx
        .mime
        .get_content_type(&extension)
        .ok_or_else(|| HandleError::UnsupportedMediaType(extension.clone()))?;
    Ok(http::build_200_response(content_type, contents))
}
