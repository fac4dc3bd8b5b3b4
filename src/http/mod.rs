//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign request ID)
//!     → dispatch.rs (select backend, forward GET, time it)
//!         → client.rs (outbound hyper client)
//!     → response.rs (JSON result or 503/500 text)
//!     → Send to client
//! ```

pub mod client;
pub mod dispatch;
pub mod echo;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use response::{DispatchError, DispatchResult};
pub use server::{AppState, HttpServer};
