//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize subsystems in dependency order
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Simulated backends start before the first health tick
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::{load_config, ConfigError};
use crate::http::{echo, HttpServer};
use crate::observability::metrics;

/// Inputs gathered from the command line.
#[derive(Debug, Clone)]
pub struct StartupOptions {
    /// Configuration file (JSON, or TOML by extension).
    pub config_path: PathBuf,
    /// Ports to run in-process echo backends on.
    pub simulated_backends: Vec<u16>,
}

/// Errors that stop the process.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load config: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Start the balancer and run it until `shutdown` fires.
///
/// A signal already buffered in `shutdown` when the listener comes up stops
/// the server straight away.
pub async fn run(
    options: StartupOptions,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    let config = load_config(&options.config_path)?;

    tracing::info!(
        path = %options.config_path.display(),
        servers = config.servers.len(),
        bind_address = %config.listener.bind_address,
        health_interval_secs = config.health_check.interval_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    for port in &options.simulated_backends {
        echo::spawn(*port).await.map_err(|source| StartupError::Bind {
            address: format!("0.0.0.0:{}", port),
            source,
        })?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    let server = HttpServer::new(config);
    server
        .run(listener, shutdown)
        .await
        .map_err(StartupError::Serve)
}
