//! Request handler module
//!
//! Turns one accepted connection into exactly one response. The response is
//! always written before `handle` returns, on error paths too; errors other
//! than a missing file are then handed back to the caller.

pub mod error;
pub mod router;
pub mod static_files;

use std::future::Future;
use std::io;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub use error::HandleError;

use crate::config::ServeContext;
use crate::http::{self, Request, Response};
use crate::logger::{self, AccessLogEntry};

/// Serve a single connection.
///
/// Reads one chunk of at most `read_buffer_size` bytes, answers it and
/// returns. A connection that sends nothing gets nothing back.
pub async fn handle<S>(
    stream: &mut S,
    remote_addr: &str,
    ctx: &ServeContext,
) -> Result<(), HandleError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let start = Instant::now();
    let mut request = None;

    let (response, escalated) = match process(stream, ctx, &mut request).await {
        Ok(response) => (response, None),
        Err(HandleError::FileNotFound(path)) => (
            Some(http::build_404_response(&path.display().to_string())),
            None,
        ),
        Err(err) => (Some(http::build_500_response()), Some(err)),
    };

    let bytes = response.as_ref().map(Response::to_bytes).unwrap_or_default();
    let sent = with_timeout(ctx.write_timeout, "write", async {
        stream.write_all(&bytes).await?;
        stream.flush().await
    })
    .await;

    if let Some(response) = &response {
        if ctx.access_log {
            log_access(remote_addr, request.as_ref(), response, start, ctx);
        }
    }

    match escalated {
        Some(err) => {
            if let Err(send_err) = sent {
                logger::log_error(&format!(
                    "Failed to send 500 response to {remote_addr}: {send_err}"
                ));
            }
            Err(err)
        }
        None => sent,
    }
}

/// Read, parse and route. `Ok(None)` means the peer sent nothing.
async fn process<S>(
    stream: &mut S,
    ctx: &ServeContext,
    request: &mut Option<Request>,
) -> Result<Option<Response>, HandleError>
where
    S: AsyncRead + Unpin,
{
    let mut buffer = vec![0u8; ctx.read_buffer_size];
    let read = with_timeout(ctx.read_timeout, "read", stream.read(&mut buffer)).await?;

    let raw = buffer[..read].trim_ascii();
    if raw.is_empty() {
        return Ok(None);
    }

    let text = std::str::from_utf8(raw)?;
    let request = request.insert(http::parse_request(text)?);

    logger::log_request(request.method(), request.resource(), request.body().len());
    if ctx.show_headers {
        logger::log_headers(request.headers());
    }

    router::respond(request, ctx).await.map(Some)
}

async fn with_timeout<T, F>(
    limit: Option<Duration>,
    op: &'static str,
    fut: F,
) -> Result<T, HandleError>
where
    F: Future<Output = io::Result<T>>,
{
    let result = match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| HandleError::Timeout(op))?,
        None => fut.await,
    };
    result.map_err(HandleError::from)
}

fn log_access(
    remote_addr: &str,
    request: Option<&Request>,
    response: &Response,
    start: Instant,
    ctx: &ServeContext,
) {
    let mut entry = AccessLogEntry::new(
        remote_addr.to_string(),
        request.map_or("-", Request::method).to_string(),
        request.map_or("-", Request::resource).to_string(),
    );
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body_len();
    entry.referer = request.and_then(|r| r.header("Referer")).map(str::to_string);
    entry.user_agent = request
        .and_then(|r| r.header("User-Agent"))
        .map(str::to_string);
    entry.request_time_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
    logger::log_access(&entry, &ctx.access_log_format);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestRoot;
    use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};

    /// Send `request` over an in-memory pipe and collect the reply
    async fn exchange(ctx: &ServeContext, request: &[u8]) -> (String, Result<(), HandleError>) {
        let (mut client, mut server) = duplex(64 * 1024);
        client.write_all(request).await.unwrap();
        client.shutdown().await.unwrap();

        let result = handle(&mut server, "127.0.0.1:40000", ctx).await;
        drop(server);

        let mut reply = Vec::new();
        client.read_to_end(&mut reply).await.unwrap();
        (String::from_utf8(reply).unwrap(), result)
    }

    fn site(name: &str) -> TestRoot {
        let root = TestRoot::new(name);
        root.write("index.html", "<h1>Welcome</h1>");
        root.write("base.css", "h1 { color: orange; }");
        root.write("deep/index.html", "<p>deep</p>");
        root.write("file.txt", "plain text");
        root
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let root = site("handle-index");
        let (reply, result) = exchange(&root.context(), b"GET / HTTP/1.1\nHost: localhost\n").await;
        result.unwrap();
        assert_eq!(
            reply,
            "HTTP/1.1 200 OK\nContent-Type: text/html\n\n<h1>Welcome</h1>\n"
        );
    }

    #[tokio::test]
    async fn test_css_content_type() {
        let root = site("handle-css");
        let (reply, result) = exchange(&root.context(), b"GET /base.css HTTP/1.1\n").await;
        result.unwrap();
        assert!(reply.starts_with("HTTP/1.1 200 OK\nContent-Type: text/css\n\n"));
        assert!(reply.contains("h1 { color: orange; }"));
    }

    #[tokio::test]
    async fn test_nested_index() {
        let root = site("handle-deep");
        let (reply, _) = exchange(&root.context(), b"GET /deep/ HTTP/1.1\n").await;
        assert!(reply.contains("<p>deep</p>"));
    }

    #[tokio::test]
    async fn test_redirect_directory() {
        let root = site("handle-redirect");
        let (reply, result) = exchange(&root.context(), b"GET /deep HTTP/1.1\n").await;
        result.unwrap();
        assert_eq!(reply, "HTTP/1.1 301 Moved Permanently\nLocation: /deep/\n");
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let root = site("handle-405");
        for request in [
            &b"POST / HTTP/1.1\n"[..],
            b"PUT /base.css HTTP/1.1\n",
            b"DELETE /deep HTTP/1.1\n",
        ] {
            let (reply, result) = exchange(&root.context(), request).await;
            result.unwrap();
            assert_eq!(reply, "HTTP/1.1 405 Method Not Allowed\n");
        }
    }

    #[tokio::test]
    async fn test_not_found_names_path() {
        let root = site("handle-404");
        let (reply, result) = exchange(&root.context(), b"GET /missing.html HTTP/1.1\n").await;
        result.unwrap();
        let expected_path = root.path().join("missing.html");
        assert!(reply.starts_with("HTTP/1.1 404 Not Found\n\n"));
        assert!(reply.contains(&format!("Cannot find {}", expected_path.display())));
    }

    #[tokio::test]
    async fn test_unmapped_extension_is_500_and_escalates() {
        let root = site("handle-txt");
        let (reply, result) = exchange(&root.context(), b"GET /file.txt HTTP/1.1\n").await;
        assert_eq!(reply, "HTTP/1.1 500 Internal Server Error\n");
        assert!(matches!(result, Err(HandleError::UnsupportedMediaType(_))));
    }

    #[tokio::test]
    async fn test_malformed_request_is_500_and_escalates() {
        let root = site("handle-malformed");
        let (reply, result) = exchange(&root.context(), b"GET  / HTTP/1.1\n").await;
        assert_eq!(reply, "HTTP/1.1 500 Internal Server Error\n");
        assert!(matches!(result, Err(HandleError::MalformedRequest(_))));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_500_and_escalates() {
        let root = site("handle-utf8");
        let (reply, result) = exchange(&root.context(), b"GET /\xff\xfe HTTP/1.1\n").await;
        assert_eq!(reply, "HTTP/1.1 500 Internal Server Error\n");
        assert!(matches!(result, Err(HandleError::Decode(_))));
    }

    #[tokio::test]
    async fn test_empty_connection_gets_no_response() {
        let root = site("handle-empty");
        let (reply, result) = exchange(&root.context(), b"").await;
        result.unwrap();
        assert!(reply.is_empty());

        let (reply, result) = exchange(&root.context(), b"  \n\n ").await;
        result.unwrap();
        assert!(reply.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_get_is_identical() {
        let root = site("handle-idempotent");
        let ctx = root.context();
        let (first, _) = exchange(&ctx, b"GET /base.css HTTP/1.1\n").await;
        let (second, _) = exchange(&ctx, b"GET /base.css HTTP/1.1\n").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_read_budget_truncates_request() {
        let root = site("handle-budget");
        let mut ctx = root.context();
        ctx.read_buffer_size = 8;
        // Only "GET /bas" is read: a request line with two fields
        let (reply, result) = exchange(&ctx, b"GET /base.css HTTP/1.1\n").await;
        assert_eq!(reply, "HTTP/1.1 500 Internal Server Error\n");
        assert!(matches!(result, Err(HandleError::MalformedRequest(_))));
    }

    #[tokio::test]
    async fn test_configured_mime_type() {
        let root = site("handle-extra-mime");
        let mut extras = std::collections::BTreeMap::new();
        extras.insert("txt".to_string(), "text/plain".to_string());
        let mut ctx = root.context();
        ctx.mime = http::MimeTable::with_extras(&extras);

        let (reply, result) = exchange(&ctx, b"GET /file.txt HTTP/1.1\n").await;
        result.unwrap();
        assert_eq!(reply, "HTTP/1.1 200 OK\nContent-Type: text/plain\n\nplain text\n");
    }

    #[tokio::test]
    async fn test_read_timeout_is_500_and_escalates() {
        let root = site("handle-timeout");
        let mut ctx = root.context();
        ctx.read_timeout = Some(Duration::from_millis(50));

        // Client keeps the pipe open without writing
        let (mut client, mut server) = duplex(1024);
        let result = handle(&mut server, "127.0.0.1:40000", &ctx).await;
        drop(server);

        let mut reply = Vec::new();
        client.read_to_end(&mut reply).await.unwrap();
        assert_eq!(reply, b"HTTP/1.1 500 Internal Server Error\n");
        assert!(matches!(result, Err(HandleError::Timeout("read"))));
    }

    #[tokio::test]
    async fn test_show_headers_does_not_change_response() {
        let root = site("handle-show-headers");
        let mut ctx = root.context();
        ctx.show_headers = true;
        let (reply, result) = exchange(
            &ctx,
            b"GET /base.css HTTP/1.1\nHost: localhost:8080\nUser-Agent: curl/8.0\n\nbody",
        )
        .await;
        result.unwrap();
        assert!(reply.starts_with("HTTP/1.1 200 OK\nContent-Type: text/css\n\n"));
    }

    #[tokio::test]
    async fn test_write_timeout_on_stalled_client() {
        let root = site("handle-write-timeout");
        let mut ctx = root.context();
        ctx.write_timeout = Some(Duration::from_millis(50));

        // The reply is larger than the pipe and the client never reads it
        let (mut client, mut server) = duplex(8);
        client.write_all(b"GET / x").await.unwrap();
        client.shutdown().await.unwrap();

        let result = handle(&mut server, "127.0.0.1:40000", &ctx).await;
        assert!(matches!(result, Err(HandleError::Timeout("write"))), "got {result:?}");
        drop(client);
    }

    #[tokio::test]
    async fn test_escalated_error_wins_over_send_failure() {
        let root = site("handle-send-failure");
        let (mut client, mut server) = duplex(1024);
        client.write_all(b"GET /file.txt HTTP/1.1\n").await.unwrap();
        // Peer is gone before the 500 goes out
        drop(client);

        let result = handle(&mut server, "127.0.0.1:40000", &root.context()).await;
        assert!(matches!(result, Err(HandleError::UnsupportedMediaType(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn test_send_failure_after_404_is_returned() {
        let root = site("handle-404-send-failure");
        let (mut client, mut server) = duplex(1024);
        client.write_all(b"GET /missing.html HTTP/1.1\n").await.unwrap();
        drop(client);

        let result = handle(&mut server, "127.0.0.1:40000", &root.context()).await;
        assert!(matches!(result, Err(HandleError::Io(_))), "got {result:?}");
    }
}
