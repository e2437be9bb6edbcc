// Server loop module
// Accepts connections one at a time and serves each before the next accept

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;

use crate::config::ServeContext;
use crate::handler;
use crate::logger;

/// Run until `shutdown` is notified.
///
/// A connection is handled to completion inside the accept branch, so no two
/// connections are ever served at once. Failures of a single connection are
/// logged and the loop moves on.
pub async fn start_server_loop(
    listener: TcpListener,
    ctx: Arc<ServeContext>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => serve_connection(stream, peer_addr, &ctx).await,
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = shutdown.notified() => {
                logger::log_shutdown();
                break;
            }
        }
    }
}

async fn serve_connection(mut stream: TcpStream, peer_addr: SocketAddr, ctx: &ServeContext) {
    logger::log_connection_accepted(&peer_addr);
    if let Err(e) = handler::handle(&mut stream, &peer_addr.to_string(), ctx).await {
        logger::log_connection_error(&peer_addr, &e);
    }
}
