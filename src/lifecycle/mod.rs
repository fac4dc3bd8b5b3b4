//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Metrics → Simulated backends → Bind → Serve + health monitor
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Server and monitor stop → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: a bad config stops startup before any port is bound
//! - In-flight requests are not drained on shutdown

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{StartupError, StartupOptions};
