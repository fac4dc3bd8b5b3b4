//! Backend descriptor.
//!
//! # Responsibilities
//! - Identify a single backend server by host and port
//! - Build probe and forward targets for it

use std::fmt;

use axum::http::Uri;
use url::Url;

use crate::config::ServerConfig;

/// A single backend server.
///
/// Immutable once created. Two descriptors are equal when host and port match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Backend {
    host: String,
    port: u16,
    /// Pre-calculated base URL (`http://host:port/`).
    base_url: Url,
}

impl Backend {
    /// Create a new backend.
    ///
    /// The host must be a bare host name or IP literal. Anything that would
    /// carry a port, userinfo, a path, a query or a fragment into the URL is
    /// rejected.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, url::ParseError> {
        let host = host.into();
        // `set_host` silently drops anything after a colon outside brackets.
        if !host.starts_with('[') && host.contains(':') {
            return Err(url::ParseError::InvalidDomainCharacter);
        }

        let mut base_url = Url::parse("http://localhost/")?;
        base_url.set_host(Some(&host))?;
        base_url
            .set_port(Some(port))
            .map_err(|()| url::ParseError::InvalidPort)?;

        if !base_url.username().is_empty()
            || base_url.path() != "/"
            || base_url.query().is_some()
            || base_url.fragment().is_some()
        {
            return Err(url::ParseError::InvalidDomainCharacter);
        }

        Ok(Self {
            host,
            port,
            base_url,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Base address used for liveness probes.
    pub fn probe_uri(&self) -> Result<Uri, axum::http::uri::InvalidUri> {
        self.base_url.as_str().parse()
    }

    /// Forward target tagged with the rotation slot that selected this backend.
    pub fn forward_uri(&self, slot: usize) -> Result<Uri, axum::http::uri::InvalidUri> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("server", &slot.to_string());
        url.as_str().parse()
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl TryFrom<&ServerConfig> for Backend {
    type Error = url::ParseError;

    fn try_from(config: &ServerConfig) -> Result<Self, Self::Error> {
        Backend::new(config.host.clone(), config.port)
    }
}

/// Convert configured servers into backends, skipping invalid entries.
pub fn backends_from_config(servers: &[ServerConfig]) -> Vec<Backend> {
    servers
        .iter()
        .filter_map(|server| match Backend::try_from(server) {
            Ok(backend) => Some(backend),
            Err(e) => {
                tracing::warn!(host = %server.host, port = server.port, error = %e, "Invalid backend address");
                None
            }
        })
        .collect()
}
