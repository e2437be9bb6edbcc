use std::sync::Arc;
use tokio::sync::Notify;

use wwwserve::config::{Config, ServeContext};
use wwwserve::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config".to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Connections are served strictly one after another
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    logger::log_server_start(&addr, &cfg);
    match cfg.to_toml() {
        Ok(rendered) => logger::log_effective_config(&rendered),
        Err(e) => logger::log_warning(&format!("Cannot render configuration: {e}")),
    }

    let ctx = Arc::new(ServeContext::from_config(&cfg));
    let shutdown = Arc::new(Notify::new());
    server::signal::start_signal_handler(Arc::clone(&shutdown));

    server::start_server_loop(listener, ctx, shutdown).await;
    Ok(())
}
