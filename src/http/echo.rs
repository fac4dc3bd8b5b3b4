//! In-process echo backend.
//!
//! Answers `GET /?server=<n>` with `Server <n> response`. Started by
//! `--simulate-backend` for local demos and used as a test double.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{extract::Query, routing::get, Router};
use tokio::net::TcpListener;

/// Router serving the echo handler on `/`.
pub fn router() -> Router {
    Router::new().route("/", get(echo))
}

async fn echo(Query(params): Query<HashMap<String, String>>) -> String {
    let server = params.get("server").map(String::as_str).unwrap_or_default();
    format!("Server {} response", server)
}

/// Serve the echo backend on an already bound listener.
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    axum::serve(listener, router()).await
}

/// Bind `0.0.0.0:<port>` and serve the echo backend in the background.
pub async fn spawn(port: u16) -> std::io::Result<SocketAddr> {
    let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await?;
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "Starting simulated backend");

    tokio::spawn(async move {
        if let Err(e) = serve(listener).await {
            tracing::error!(address = %addr, error = %e, "Simulated backend stopped");
        }
    });
    Ok(addr)
}
