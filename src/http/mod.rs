//! HTTP hosting subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum serve, graceful shutdown)
//!     → request.rs (assign / propagate x-request-id)
//!     → tower-http trace + timeout layers
//!     → redirect chain (fallback service of the router)
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::{request_id, RequestIdGenerator, X_REQUEST_ID};
pub use server::HttpServer;
