//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the compliance mode registry from built-ins and config
//! - Resolve the active mode once, before any listener starts
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The resolved mode is immutable for the lifetime of the process

use std::sync::Arc;
use thiserror::Error;

use crate::compliance::{ComplianceMode, ModeRegistry, ModeRegistryBuilder, RegistryError};
use crate::config::{ComplianceConfig, ConfigError};

/// Fatal errors raised before the server accepts traffic.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("compliance registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Register the built-in modes followed by the configured custom ones.
pub fn build_registry(config: &ComplianceConfig) -> Result<ModeRegistry, RegistryError> {
    let mut builder = ModeRegistryBuilder::with_builtins();
    for mode in &config.modes {
        builder.register(mode.name.clone(), mode.tolerate.iter().copied())?;
    }
    Ok(builder.build())
}

/// Resolve the mode the server will run with.
///
/// `override_name` (from the command line) takes precedence over
/// `compliance.mode`.
pub fn resolve_mode(
    config: &ComplianceConfig,
    override_name: Option<&str>,
) -> Result<Arc<ComplianceMode>, RegistryError> {
    let registry = build_registry(config)?;
    let name = override_name.unwrap_or(&config.mode);
    let mode = registry.lookup(name)?;

    tracing::info!(
        mode = %mode,
        available = ?registry.names().collect::<Vec<_>>(),
        "Compliance mode selected"
    );
    Ok(mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::mode::{RFC6265, RFC6265_WITH_VIOLATIONS};
    use crate::compliance::ViolationKind;
    use crate::config::CustomModeConfig;

    fn custom(name: &str, tolerate: Vec<ViolationKind>) -> CustomModeConfig {
        CustomModeConfig {
            name: name.into(),
            tolerate,
        }
    }

    #[test]
    fn test_default_mode_is_strict() {
        let mode = resolve_mode(&ComplianceConfig::default(), None).unwrap();
        assert_eq!(mode.name(), RFC6265);
        assert!(mode.is_strict());
    }

    #[test]
    fn test_override_wins() {
        let mode =
            resolve_mode(&ComplianceConfig::default(), Some(RFC6265_WITH_VIOLATIONS)).unwrap();
        assert_eq!(mode.name(), RFC6265_WITH_VIOLATIONS);
    }

    #[test]
    fn test_custom_mode_from_config() {
        let config = ComplianceConfig {
            mode: "HOSTS".into(),
            modes: vec![custom("HOSTS", vec![ViolationKind::DuplicateHostHeaders])],
            ..ComplianceConfig::default()
        };
        let mode = resolve_mode(&config, None).unwrap();
        assert!(mode.tolerates(ViolationKind::DuplicateHostHeaders));
    }

    #[test]
    fn test_registry_errors_are_fatal() {
        let clash = ComplianceConfig {
            modes: vec![custom(RFC6265, vec![])],
            ..ComplianceConfig::default()
        };
        assert_eq!(
            resolve_mode(&clash, None).unwrap_err(),
            RegistryError::DuplicateModeName(RFC6265.into())
        );

        let missing = resolve_mode(&ComplianceConfig::default(), Some("NOPE")).unwrap_err();
        let err: StartupError = missing.into();
        assert_eq!(
            err.to_string(),
            "compliance registry error: unknown compliance mode: NOPE"
        );
    }
}
