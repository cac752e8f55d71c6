//! Web front end: sign in with Microsoft, confirm, export.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
pub use error::WebError;
pub use routes::build_routes;
pub use state::{AppState, GraphSettings, Session};
use tracing::info;

/// Bind `addr` and serve the application until Ctrl+C.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
  let listener = tokio::net::TcpListener::bind(addr)
    .await
    .with_context(|| format!("Failed to bind {addr}"))?;
  let local = listener.local_addr().context("Failed to read bound address")?;
  info!("Listening on http://{local}");

  axum::serve(listener, build_routes(Arc::new(state)))
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Web server stopped unexpectedly")
}

async fn shutdown_signal() {
  if tokio::signal::ctrl_c().await.is_ok() {
    info!("Shutting down");
  }
}
