//! Path-based redirect server library.
//!
//! Request paths are looked up in a chain of redirect tables; the first table
//! holding the exact path answers with `302 Found`, otherwise the request
//! falls through to the next handler and finally to a terminal handler.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod redirect;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use redirect::{json_handler, map_handler, yaml_handler, MapHandler, ParseError, PathMapping, PathRoute};
