//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the redirect server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Redirect tables, in chain order.
    pub redirects: RedirectConfig,

    /// Terminal handler reached when no table matches.
    pub fallback: FallbackConfig,
}

impl ServerConfig {
    /// Default settings plus the demo redirect tables.
    pub fn demo() -> Self {
        Self {
            redirects: RedirectConfig::demo(),
            ..Self::default()
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Redirect sources.
///
/// Requests are checked against the JSON table first, then the YAML table,
/// then the static `paths` table, and finally reach the fallback.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RedirectConfig {
    /// Static path → URL table.
    pub paths: BTreeMap<String, String>,

    /// Inline YAML redirect table.
    pub yaml: Option<String>,

    /// YAML redirect table read from disk at startup.
    pub yaml_file: Option<PathBuf>,

    /// JSON redirect table read from disk at startup.
    pub json_file: Option<PathBuf>,
}

impl RedirectConfig {
    /// The demo tables served when no config file is given.
    pub fn demo() -> Self {
        let paths = BTreeMap::from([
            (
                "/urlshort-godoc".to_string(),
                "https://godoc.org/github.com/gophercises/urlshort".to_string(),
            ),
            (
                "/yaml-godoc".to_string(),
                "https://godoc.org/gopkg.in/yaml.v2".to_string(),
            ),
        ]);

        Self {
            paths,
            yaml: Some(DEFAULT_YAML.to_string()),
            yaml_file: None,
            json_file: None,
        }
    }
}

const DEFAULT_YAML: &str = "\
- path: /urlshort
  url: https://github.com/gophercises/urlshort
- path: /urlshort-final
  url: https://github.com/gophercises/urlshort/tree/solution
";

/// Terminal handler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Plain-text body returned for every unmatched path.
    pub body: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            body: "Hello, world!\n".to_string(),
        }
    }
}
