use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use paperlens_pdf::MupdfBackend;

mod render;
mod routes;
mod state;
mod upload;

use state::AppState;

const DEFAULT_ADDR: &str = "0.0.0.0:5001";

fn init_logging() {
    let filter = EnvFilter::try_from_env("PAPERLENS_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("cannot listen for ctrl-c: {e}");
    }
    log::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let addr: SocketAddr = std::env::var("PAPERLENS_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .context("PAPERLENS_ADDR must be a socket address like 127.0.0.1:5001")?;

    let state = AppState::new(Arc::new(MupdfBackend));
    let app = routes::router(state, routes::DEFAULT_BODY_LIMIT);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;
    log::info!("listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
