//! Outbound HTTP client shared by the dispatcher and the health monitor.

use std::time::Duration;

use axum::body::Body;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::ForwardConfig;

/// Client type used for every backend request.
pub type HttpClient = Client<HttpConnector, Body>;

/// Build the backend client.
///
/// Idle connections are never kept: each forward and probe opens a fresh one.
pub fn build_client(config: &ForwardConfig) -> HttpClient {
    let mut connector = HttpConnector::new();
    connector.set_connect_timeout(Some(Duration::from_secs(config.connect_timeout_secs)));

    Client::builder(TokioExecutor::new())
        .pool_max_idle_per_host(0)
        .build(connector)
}
