//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, ports valid)
//! - Reject duplicate backends
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BalancerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::BalancerConfig;
use crate::load_balancer::Backend;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("server #{index}: host is empty")]
    EmptyHost { index: usize },

    #[error("server #{index}: port must be non-zero")]
    ZeroPort { index: usize },

    #[error("server #{index}: {host}:{port} is not a valid backend address")]
    InvalidBackend { index: usize, host: String, port: u16 },

    #[error("server #{index}: duplicate backend {host}:{port}")]
    DuplicateBackend { index: usize, host: String, port: u16 },

    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("health_check.{0} must be greater than zero")]
    ZeroHealthSetting(&'static str),

    #[error("forward.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &BalancerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, server) in config.servers.iter().enumerate() {
        if server.host.trim().is_empty() {
            errors.push(ValidationError::EmptyHost { index });
            continue;
        }
        if server.port == 0 {
            errors.push(ValidationError::ZeroPort { index });
            continue;
        }
        if Backend::new(server.host.as_str(), server.port).is_err() {
            errors.push(ValidationError::InvalidBackend {
                index,
                host: server.host.clone(),
                port: server.port,
            });
            continue;
        }
        if !seen.insert((server.host.as_str(), server.port)) {
            errors.push(ValidationError::DuplicateBackend {
                index,
                host: server.host.clone(),
                port: server.port,
            });
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.health_check.interval_secs == 0 {
        errors.push(ValidationError::ZeroHealthSetting("interval_secs"));
    }
    if config.health_check.timeout_secs == 0 {
        errors.push(ValidationError::ZeroHealthSetting("timeout_secs"));
    }

    if config.forward.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
