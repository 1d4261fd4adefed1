//! Startup orchestration.
//!
//! # Responsibilities
//! - Read redirect tables named by the configuration
//! - Assemble the handler chain in precedence order
//! - Build the terminal handler that answers everything else
//!
//! # Chain Order
//! ```text
//! request → JSON table → YAML table → static paths → terminal
//! ```
//! A source that is not configured contributes an empty table, which always
//! falls through, so the chain has the same shape for every configuration.

use std::fs;
use std::path::{Path, PathBuf};

use axum::Router;

use crate::config::{FallbackConfig, RedirectConfig};
use crate::redirect::{json_handler, yaml_handler, MapHandler, ParseError, PathMapping};

/// Fully assembled chain over a terminal handler `T`.
pub type RedirectChain<T> = MapHandler<MapHandler<MapHandler<T>>>;

/// Error type for chain assembly.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to read redirect table {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("redirects.yaml and redirects.yaml_file are mutually exclusive")]
    ConflictingYamlSources,

    #[error("failed to load {origin} redirect table: {source}")]
    Parse {
        origin: String,
        #[source]
        source: ParseError,
    },
}

/// Terminal handler: answers every path with the configured body.
pub fn terminal_handler(config: &FallbackConfig) -> Router {
    let body = config.body.clone();
    Router::new().fallback(move || {
        let body = body.clone();
        async move { body }
    })
}

/// Compose the redirect chain described by `config` on top of `terminal`.
pub fn build_chain<T>(config: &RedirectConfig, terminal: T) -> Result<RedirectChain<T>, StartupError> {
    let static_paths = MapHandler::new(
        config.paths.clone().into_iter().collect::<PathMapping>(),
        terminal,
    );

    let yaml = match (&config.yaml_file, &config.yaml) {
        (Some(_), Some(_)) => return Err(StartupError::ConflictingYamlSources),
        (Some(path), None) => {
            let bytes = read_table(path)?;
            yaml_handler(&bytes, static_paths).map_err(|source| StartupError::Parse {
                origin: path.display().to_string(),
                source,
            })?
        }
        (None, Some(inline)) => {
            yaml_handler(inline.as_bytes(), static_paths).map_err(|source| StartupError::Parse {
                origin: "inline YAML".to_string(),
                source,
            })?
        }
        (None, None) => MapHandler::new(PathMapping::new(), static_paths),
    };

    let json = match &config.json_file {
        Some(path) => {
            let bytes = read_table(path)?;
            json_handler(&bytes, yaml).map_err(|source| StartupError::Parse {
                origin: path.display().to_string(),
                source,
            })?
        }
        None => MapHandler::new(PathMapping::new(), yaml),
    };

    let [(_, json_paths), (_, yaml_paths), (_, static_paths)] = route_counts(&json);
    tracing::info!(json_paths, yaml_paths, static_paths, "Redirect chain assembled");

    Ok(json)
}

/// Number of distinct paths held by each table, outermost first.
pub fn route_counts<T>(chain: &RedirectChain<T>) -> [(&'static str, usize); 3] {
    let yaml = chain.fallback();
    let static_paths = yaml.fallback();
    [
        ("json", chain.mapping().len()),
        ("yaml", yaml.mapping().len()),
        ("static", static_paths.mapping().len()),
    ]
}

fn read_table(path: &Path) -> Result<Vec<u8>, StartupError> {
    fs::read(path).map_err(|source| StartupError::Read {
        path: path.to_path_buf(),
        source,
    })
}
