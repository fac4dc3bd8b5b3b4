//! Active health checking.
//!
//! # Responsibilities
//! - Periodically probe backends, all at once, each with its own timeout
//! - Replace the pool with the reachable subset in one step per tick

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, uri::InvalidUri, Method, Request};
use futures_util::future::join_all;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::config::{HealthCheckConfig, ProbeScope};
use crate::http::client::HttpClient;
use crate::load_balancer::{Backend, BackendPool};
use crate::observability::metrics;

const PROBE_USER_AGENT: &str = "balancer-health-check";

/// Why a backend failed its liveness probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid probe target: {0}")]
    Target(#[from] InvalidUri),

    #[error("failed to build probe request: {0}")]
    Build(#[from] axum::http::Error),

    #[error("connection error: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),
}

pub struct HealthMonitor {
    pool: Arc<BackendPool>,
    /// Every configured backend, in configuration order.
    known: Vec<Backend>,
    config: HealthCheckConfig,
    client: HttpClient,
}

impl HealthMonitor {
    pub fn new(
        pool: Arc<BackendPool>,
        known: Vec<Backend>,
        config: HealthCheckConfig,
        client: HttpClient,
    ) -> Self {
        Self {
            pool,
            known,
            config,
            client,
        }
    }

    /// Probe on a fixed interval until shutdown. The first tick fires immediately.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.config.enabled {
            tracing::info!("Active health checks disabled");
            return;
        }

        tracing::info!(
            interval = self.config.interval_secs,
            timeout = self.config.timeout_secs,
            scope = ?self.config.scope,
            "Health monitor starting"
        );

        let mut ticker = time::interval(Duration::from_secs(self.config.interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check_all().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Run one tick: probe, then replace the pool with the reachable backends.
    ///
    /// Returns the new member list.
    pub async fn check_all(&self) -> Vec<Backend> {
        let candidates = match self.config.scope {
            ProbeScope::Known => self.known.clone(),
            ProbeScope::Current => self.pool.snapshot(),
        };

        let results = join_all(candidates.iter().map(|backend| self.probe(backend))).await;

        let reachable: Vec<Backend> = candidates
            .into_iter()
            .zip(results)
            .filter_map(|(backend, result)| {
                let addr = backend.to_string();
                match result {
                    Ok(()) => {
                        metrics::record_backend_health(&addr, true);
                        Some(backend)
                    }
                    Err(e) => {
                        tracing::error!(backend = %addr, error = %e, "Health probe failed");
                        metrics::record_backend_health(&addr, false);
                        None
                    }
                }
            })
            .collect();

        let previous = self.pool.snapshot();
        for backend in reachable.iter().filter(|b| !previous.contains(b)) {
            tracing::info!(backend = %backend, "Backend up");
        }
        for backend in previous.iter().filter(|b| !reachable.contains(b)) {
            tracing::info!(backend = %backend, "Backend down");
        }

        self.pool.replace_members(reachable.clone());
        metrics::record_pool_size(reachable.len());
        tracing::debug!(members = reachable.len(), "Pool refreshed");

        reachable
    }

    /// Any response, whatever its status, counts as reachable.
    async fn probe(&self, backend: &Backend) -> Result<(), ProbeError> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(backend.probe_uri()?)
            .header(header::USER_AGENT, PROBE_USER_AGENT)
            .body(Body::empty())?;

        let timeout = Duration::from_secs(self.config.timeout_secs);
        match time::timeout(timeout, self.client.request(request)).await {
            Ok(Ok(response)) => {
                tracing::trace!(backend = %backend, status = %response.status(), "Probe answered");
                Ok(())
            }
            Ok(Err(e)) => Err(ProbeError::Request(e)),
            Err(_) => Err(ProbeError::Timeout(timeout)),
        }
    }
}
