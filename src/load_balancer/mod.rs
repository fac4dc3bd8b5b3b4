//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → pool.rs (lock, read member under cursor, advance)
//!         - round_robin.rs (cursor arithmetic)
//!     → backend.rs (build forward target)
//!     → Return selection or NotAvailable
//!
//! Health monitor tick
//!     → pool.rs (replace members wholesale)
//! ```
//!
//! # Design Decisions
//! - Pool owns members and cursor; callers only see select/replace
//! - Unreachable backends are removed from the pool, not flagged
//! - Selection is purely positional

pub mod backend;
pub mod pool;
pub mod round_robin;

pub use backend::Backend;
pub use pool::{BackendPool, PoolError, Selection};
