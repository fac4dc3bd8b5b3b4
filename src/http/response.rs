//! Response composition and error mapping.
//!
//! # Responsibilities
//! - Define the JSON payload returned for a served request
//! - Map dispatch failures onto status codes and plain-text bodies
//!
//! # Design Decisions
//! - Backend status codes are not relayed; a served request is always 200
//! - 503 means nothing to select, 500 means the chosen backend failed

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::load_balancer::PoolError;

/// Body text for 503 responses.
pub const NO_SERVERS_BODY: &str = "No servers available";
/// Body text for 500 responses.
pub const SERVER_ERROR_BODY: &str = "Server error";

/// Payload for a successfully dispatched request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResult {
    /// Serving backend as `host:port`.
    pub server: String,
    /// Seconds until the backend's response headers arrived.
    pub response_time: f64,
    /// Raw backend body.
    pub body: String,
}

/// Per-request failures. None of them leave the dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no servers available")]
    PoolExhausted,

    #[error("invalid forward target for {backend}: {source}")]
    Target {
        backend: String,
        #[source]
        source: axum::http::Error,
    },

    #[error("forwarding to {backend} failed: {source}")]
    Forward {
        backend: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    #[error("reading body from {backend} failed: {source}")]
    BodyRead {
        backend: String,
        #[source]
        source: axum::Error,
    },
}

impl DispatchError {
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::PoolExhausted => StatusCode::SERVICE_UNAVAILABLE,
            DispatchError::Target { .. }
            | DispatchError::Forward { .. }
            | DispatchError::BodyRead { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Backend involved in the failure, if one had been selected.
    pub fn backend(&self) -> Option<&str> {
        match self {
            DispatchError::PoolExhausted => None,
            DispatchError::Target { backend, .. }
            | DispatchError::Forward { backend, .. }
            | DispatchError::BodyRead { backend, .. } => Some(backend),
        }
    }
}

impl From<PoolError> for DispatchError {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::NotAvailable => DispatchError::PoolExhausted,
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let body = match &self {
            DispatchError::PoolExhausted => NO_SERVERS_BODY,
            _ => SERVER_ERROR_BODY,
        };
        (self.status(), body).into_response()
    }
}
