//! Request dispatch.
//!
//! # Responsibilities
//! - Pick the next backend in rotation
//! - Forward the request to it as a GET, timing the round trip
//! - Relay the backend body wrapped in a JSON result
//!
//! # Design Decisions
//! - Exactly one attempt per request; no retry against another backend
//! - Failures never touch pool membership (the health monitor owns it)
//! - The inbound method and path are not forwarded; backends always see `GET /`

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Method, Request},
    response::{IntoResponse, Response},
    Json,
};

use crate::http::request::{request_id, X_REQUEST_ID};
use crate::http::response::{DispatchError, DispatchResult};
use crate::http::server::AppState;
use crate::load_balancer::Selection;
use crate::observability::metrics;

/// Handler for every inbound route.
pub async fn dispatch_handler(
    State(state): State<AppState>,
    ConnectInfo(origin): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let request_id = request_id(request.headers()).to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        "Dispatching request"
    );

    match dispatch(&state, origin, &request_id).await {
        Ok(result) => {
            metrics::record_request(200, &result.server);
            Json(result).into_response()
        }
        Err(e) => {
            metrics::record_request(e.status().as_u16(), e.backend().unwrap_or("none"));
            e.into_response()
        }
    }
}

/// Serve one request end to end against the next backend in rotation.
pub async fn dispatch(
    state: &AppState,
    origin: SocketAddr,
    request_id: &str,
) -> Result<DispatchResult, DispatchError> {
    if state.pool.is_empty() {
        tracing::warn!(request_id = %request_id, origin = %origin, "No servers available");
        return Err(DispatchError::PoolExhausted);
    }

    // The pool can still empty between the check above and selection.
    let Selection { backend, slot } = match state.pool.select_next() {
        Ok(selection) => selection,
        Err(e) => {
            tracing::warn!(request_id = %request_id, origin = %origin, "Pool emptied before selection");
            return Err(e.into());
        }
    };
    let server = backend.to_string();

    let target = backend
        .forward_uri(slot)
        .map_err(|e| DispatchError::Target {
            backend: server.clone(),
            source: e.into(),
        })?;
    let request = Request::builder()
        .method(Method::GET)
        .uri(target)
        .header(X_REQUEST_ID, request_id)
        .body(Body::empty())
        .map_err(|source| DispatchError::Target {
            backend: server.clone(),
            source,
        })?;

    let started = Instant::now();
    let response = match state.client.request(request).await {
        Ok(response) => response,
        Err(source) => {
            tracing::error!(
                request_id = %request_id,
                backend = %server,
                error = %source,
                "Error forwarding request"
            );
            return Err(DispatchError::Forward {
                backend: server,
                source,
            });
        }
    };
    let elapsed = started.elapsed();
    metrics::record_upstream_duration(&server, elapsed);

    let body = match axum::body::to_bytes(
        Body::new(response.into_body()),
        state.forward.max_body_bytes,
    )
    .await
    {
        Ok(body) => body,
        Err(source) => {
            tracing::error!(
                request_id = %request_id,
                backend = %server,
                error = %source,
                "Error reading backend body"
            );
            return Err(DispatchError::BodyRead {
                backend: server,
                source,
            });
        }
    };

    tracing::info!(
        request_id = %request_id,
        origin = %origin,
        backend = %server,
        slot,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "Request served"
    );

    Ok(DispatchResult {
        server,
        response_time: elapsed.as_secs_f64(),
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}
