//! Redirect resolution subsystem.
//!
//! # Data Flow
//! ```text
//! redirect table (YAML / JSON bytes, or a static map)
//!     → loader.rs (deserialize into ordered PathRoute records)
//!     → mapping.rs (fold into PathMapping, last write wins)
//!     → map_handler.rs (wrap mapping + fallback into a tower Service)
//!
//! Per request:
//!     request path
//!     → MapHandler lookup (exact match)
//!     → hit:  response.rs builds 302 Found + Location
//!     → miss: request handed unmodified to the fallback service
//! ```
//!
//! # Design Decisions
//! - A handler is any `tower::Service<Request<B>>` that cannot fail, so a
//!   resolver, an axum `Router` or a `service_fn` can all sit in a chain
//! - Mappings are immutable once built and shared via `Arc`
//! - Parsing is the only fallible step; resolution is total

pub mod loader;
pub mod map_handler;
pub mod mapping;
pub mod response;

pub use loader::{json_handler, parse_json, parse_yaml, yaml_handler, ParseError};
pub use map_handler::{map_handler, MapHandler};
pub use mapping::{PathMapping, PathRoute};
