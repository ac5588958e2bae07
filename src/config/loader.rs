//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    let config: ServerConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::ViolationKind;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.compliance.mode, "RFC6265");
        assert!(config.compliance.record_violations);
    }

    #[test]
    fn test_full_file() {
        let config = parse_config(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [timeouts]
            request_secs = 5

            [compliance]
            mode = "HOST_LENIENT"
            record_violations = false

            [[compliance.modes]]
            name = "HOST_LENIENT"
            tolerate = ["DUPLICATE_HOST_HEADERS", "UNSAFE_HOST_HEADER"]

            [observability]
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.timeouts.request_secs, 5);
        assert!(!config.compliance.record_violations);
        assert_eq!(
            config.compliance.modes[0].tolerate,
            vec![
                ViolationKind::DuplicateHostHeaders,
                ViolationKind::UnsafeHostHeader
            ]
        );
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_unknown_violation_kind_is_parse_error() {
        let err = parse_config(
            r#"
            [[compliance.modes]]
            name = "X"
            tolerate = ["NOT_A_KIND"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_errors_are_joined() {
        let err = parse_config(
            r#"
            [compliance]
            mode = "NOPE"
            "#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: compliance.mode refers to an unknown mode: NOPE"
        );
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
