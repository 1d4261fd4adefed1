//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, bind address parses)
//! - Detect conflicting redirect sources
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Destination URLs are not validated

use std::net::SocketAddr;

use crate::config::schema::ServerConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("observability.log_level {0:?} is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),

    #[error("redirects.yaml and redirects.yaml_file are mutually exclusive")]
    ConflictingYamlSources,

    #[error("redirects.paths key {0:?} must start with '/'")]
    RelativePathKey(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.redirects.yaml.is_some() && config.redirects.yaml_file.is_some() {
        errors.push(ValidationError::ConflictingYamlSources);
    }

    for path in config.redirects.paths.keys() {
        if !path.starts_with('/') {
            errors.push(ValidationError::RelativePathKey(path.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(validate_config(&ServerConfig::default()), Ok(()));
        assert_eq!(validate_config(&ServerConfig::demo()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServerConfig::demo();
        config.listener.bind_address = "localhost".to_string();
        config.timeouts.request_secs = 0;
        config.observability.log_level = "loud".to_string();
        config.redirects.yaml_file = Some(PathBuf::from("redirects.yaml"));
        config
            .redirects
            .paths
            .insert("docs".to_string(), "https://docs.example.com".to_string());

        let errors = validate_config(&config).unwrap_err();

        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidBindAddress("localhost".to_string()),
                ValidationError::ZeroRequestTimeout,
                ValidationError::UnknownLogLevel("loud".to_string()),
                ValidationError::ConflictingYamlSources,
                ValidationError::RelativePathKey("docs".to_string()),
            ]
        );
    }

    #[test]
    fn test_log_level_case_insensitive() {
        let mut config = ServerConfig::default();
        config.observability.log_level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
