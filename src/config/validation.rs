//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that the selected compliance mode exists
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

use crate::compliance::mode::builtin_modes;
use crate::config::schema::ServerConfig;

/// A semantic problem in a parsed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("compliance mode names must not be empty")]
    EmptyModeName,

    #[error("compliance mode defined more than once: {0}")]
    DuplicateMode(String),

    #[error("compliance.mode refers to an unknown mode: {0}")]
    UnknownMode(String),
}

pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let mut known: HashSet<String> = builtin_modes()
        .iter()
        .map(|m| m.name().to_string())
        .collect();
    for mode in &config.compliance.modes {
        if mode.name.trim().is_empty() {
            errors.push(ValidationError::EmptyModeName);
        } else if !known.insert(mode.name.clone()) {
            errors.push(ValidationError::DuplicateMode(mode.name.clone()));
        }
    }

    if !known.contains(&config.compliance.mode) {
        errors.push(ValidationError::UnknownMode(config.compliance.mode.clone()));
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
    use crate::compliance::mode::LEGACY;
    use crate::config::schema::CustomModeConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ServerConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.compliance.mode = "MISSING".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidAddress {
                    field: "listener.bind_address",
                    value: "not-an-address".into(),
                },
                ValidationError::ZeroRequestTimeout,
                ValidationError::UnknownMode("MISSING".into()),
            ]
        );
    }

    #[test]
    fn test_custom_modes() {
        let mut config = ServerConfig::default();
        config.compliance.modes = vec![
            CustomModeConfig {
                name: "MINE".into(),
                tolerate: vec![],
            },
            CustomModeConfig {
                name: "MINE".into(),
                tolerate: vec![],
            },
            CustomModeConfig {
                name: LEGACY.into(),
                tolerate: vec![],
            },
            CustomModeConfig {
                name: " ".into(),
                tolerate: vec![],
            },
        ];
        config.compliance.mode = "MINE".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DuplicateMode("MINE".into()),
                ValidationError::DuplicateMode(LEGACY.into()),
                ValidationError::EmptyModeName,
            ]
        );
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = ServerConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(validate_config(&config).unwrap_err().len(), 1);
    }
}
