//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatch handler on every path
//! - Wire up middleware (request ID, tracing)
//! - Own the backend pool and the outbound client
//! - Spawn the health monitor alongside the server
//! - Serve until shutdown

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{http::HeaderName, routing::any, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{BalancerConfig, ForwardConfig};
use crate::health::HealthMonitor;
use crate::http::client::{build_client, HttpClient};
use crate::http::dispatch::dispatch_handler;
use crate::http::request::{MakeRequestUuidV4, X_REQUEST_ID};
use crate::load_balancer::{backend::backends_from_config, Backend, BackendPool};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<BackendPool>,
    pub client: HttpClient,
    pub forward: ForwardConfig,
}

/// HTTP server for the load balancer.
pub struct HttpServer {
    router: Router,
    config: BalancerConfig,
    pool: Arc<BackendPool>,
    /// Configured backends, kept for the health monitor.
    known: Vec<Backend>,
    client: HttpClient,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// The pool starts with every configured backend and the cursor at zero.
    pub fn new(config: BalancerConfig) -> Self {
        let known = backends_from_config(&config.servers);
        if known.is_empty() {
            tracing::warn!("No backends configured; every request will be rejected");
        }

        let pool = Arc::new(BackendPool::new(known.clone()));
        let client = build_client(&config.forward);

        let state = AppState {
            pool: pool.clone(),
            client: client.clone(),
            forward: config.forward.clone(),
        };

        let router = Self::build_router(state);
        Self {
            router,
            config,
            pool,
            known,
            client,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .route("/", any(dispatch_handler))
            .route("/{*path}", any(dispatch_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(request_id)),
            )
    }

    /// Shared handle to the backend pool.
    pub fn pool(&self) -> Arc<BackendPool> {
        self.pool.clone()
    }

    /// Run the server and the health monitor until `shutdown` fires.
    ///
    /// In-flight requests are abandoned on shutdown.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backends = self.known.len(),
            "HTTP server starting"
        );

        let monitor = HealthMonitor::new(
            self.pool.clone(),
            self.known,
            self.config.health_check.clone(),
            self.client,
        );
        let monitor_task = tokio::spawn(monitor.run(shutdown.resubscribe()));

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        tokio::select! {
            result = axum::serve(listener, app).into_future() => result?,
            _ = shutdown.recv() => {
                tracing::info!("HTTP server received shutdown signal");
            }
        }

        // The monitor's receiver misses a signal sent before it subscribed.
        monitor_task.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
