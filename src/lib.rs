//! Round-robin HTTP load balancer.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                  BALANCER                    │
//!   Client Request   │  ┌─────────┐    ┌──────────┐    ┌─────────┐  │
//!   ─────────────────┼─▶│  http   │───▶│ dispatch │───▶│  http   │──┼──▶ Backend
//!                    │  │ server  │    │          │    │ client  │  │
//!                    │  └─────────┘    └────┬─────┘    └─────────┘  │
//!                    │                      │ select_next           │
//!                    │                      ▼                       │
//!                    │               ┌──────────────┐               │
//!                    │               │ BackendPool  │               │
//!                    │               └──────────────┘               │
//!                    │                      ▲ replace_members       │
//!                    │                      │                       │
//!                    │               ┌──────────────┐   probes      │
//!                    │               │HealthMonitor │───────────────┼──▶ Backends
//!                    │               └──────────────┘               │
//!                    └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;

// Traffic management
pub mod health;
pub mod load_balancer;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::BalancerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
