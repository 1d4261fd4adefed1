//! Declarative Mapping Loader.
//!
//! Turns a serialized redirect table into a [`MapHandler`]. The table is an
//! ordered list of `{path, url}` records:
//!
//! ```yaml
//! - path: /urlshort
//!   url: https://github.com/gophercises/urlshort
//! - path: /urlshort-final
//!   url: https://github.com/gophercises/urlshort/tree/solution
//! ```
//!
//! The same records are accepted as a JSON array. Input must already be in
//! memory; nothing here touches the filesystem.

use crate::redirect::map_handler::MapHandler;
use crate::redirect::mapping::{PathMapping, PathRoute};

/// A redirect table that could not be turned into routes.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid YAML redirect table: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON redirect table: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a YAML redirect table into its ordered records.
///
/// An empty or `null` document is an empty table.
pub fn parse_yaml(config: &[u8]) -> Result<Vec<PathRoute>, ParseError> {
    if config.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let routes: Option<Vec<PathRoute>> = serde_yaml::from_slice(config)?;
    Ok(routes.unwrap_or_default())
}

/// Parse a JSON redirect table into its ordered records.
pub fn parse_json(config: &[u8]) -> Result<Vec<PathRoute>, ParseError> {
    if config.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_slice(config)?)
}

/// Build a resolver from a YAML redirect table.
pub fn yaml_handler<F>(config: &[u8], fallback: F) -> Result<MapHandler<F>, ParseError> {
    let routes = parse_yaml(config)?;
    Ok(build(routes, fallback, "yaml"))
}

/// Build a resolver from a JSON redirect table.
pub fn json_handler<F>(config: &[u8], fallback: F) -> Result<MapHandler<F>, ParseError> {
    let routes = parse_json(config)?;
    Ok(build(routes, fallback, "json"))
}

fn build<F>(routes: Vec<PathRoute>, fallback: F, kind: &'static str) -> MapHandler<F> {
    let records = routes.len();
    let mapping = PathMapping::from_routes(routes);

    tracing::debug!(
        kind,
        records,
        paths = mapping.len(),
        "Redirect table loaded"
    );

    MapHandler::new(mapping, fallback)
}
