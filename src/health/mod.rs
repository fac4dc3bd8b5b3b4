//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active health checks (active.rs):
//!     Periodic timer (first tick immediate)
//!     → Probe every candidate backend concurrently
//!     → Keep those that answered, in order
//!     → Replace pool members in one step
//! ```
//!
//! # Design Decisions
//! - The monitor is the only writer of pool membership
//! - Any HTTP response counts as alive; only transport errors evict
//! - Dispatch failures do not feed back into eviction

pub mod active;

pub use active::{HealthMonitor, ProbeError};
