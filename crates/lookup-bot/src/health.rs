//! Liveness HTTP endpoint for the hosting platform
//!
//! Serves fixed plaintext on `GET /` and `GET /health`. Shares no state with
//! the conversation engine.

use crate::error::Result;
use axum::Router;
use axum::routing::get;
use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub const ROOT_TEXT: &str = "🤖 Lookup bot is running";
pub const HEALTH_TEXT: &str = "✅ Bot is healthy!";

/// Build the liveness router
pub fn router() -> Router {
    Router::new()
        .route("/", get(|| async { ROOT_TEXT }))
        .route("/health", get(|| async { HEALTH_TEXT }))
        .layer(TraceLayer::new_for_http())
}

/// Serve the liveness endpoint on `0.0.0.0:port` until `shutdown` resolves
pub async fn serve(port: u16, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = TcpListener::bind(addr).await?;
    info!("Liveness endpoint listening on {}", listener.local_addr()?);

    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
