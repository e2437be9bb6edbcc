//! Static file serving module
//!
//! Resolves a resource against the serve root and loads it as text.
//! Resources are joined to the root as-is: `..` segments are not filtered
//! and can reach outside the root.

use std::io::ErrorKind;
use std::path::PathBuf;

use tokio::fs;

use super::error::HandleError;
use crate::config::ServeContext;

/// True iff the last character of the resource is `/`
pub fn has_trailing_slash(resource: &str) -> bool {
    resource.ends_with('/')
}

/// True iff the final path segment contains a dot
pub fn has_file_extension(resource: &str) -> bool {
    // None orders below Some, so a dot with no slash counts
    resource.rfind('.') > resource.rfind('/')
}

/// Extension of the final path segment, taken after its last dot
pub fn file_extension(resource: &str) -> Option<&str> {
    let segment = resource.rsplit('/').next().unwrap_or(resource);
    segment.rsplit_once('.').map(|(_, ext)| ext)
}

/// Resource with the index file appended when it names a directory
pub fn resolve_resource(resource: &str, index_file: &str) -> String {
    if has_trailing_slash(resource) {
        format!("{resource}{index_file}")
    } else {
        resource.to_string()
    }
}

/// Filesystem path for a resolved resource
pub fn resolve_path(ctx: &ServeContext, resource: &str) -> PathBuf {
    ctx.root.join(resource.trim_start_matches('/'))
}

/// Load a resource as text, returning its contents and extension
pub async fn read_file(
    ctx: &ServeContext,
    resource: &str,
) -> Result<(String, String), HandleError> {
    let resource = resolve_resource(resource, &ctx.index_file);
    let extension = file_extension(&resource)
        .ok_or_else(|| HandleError::MissingExtension(resource.clone()))?
        .to_string();

    let path = resolve_path(ctx, &resource);
    match fs::read_to_string(&path).await {
        Ok(contents) => Ok((contents, extension)),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(HandleError::FileNotFound(path)),
        Err(e) => Err(HandleError::Io(e)),
    }
}
