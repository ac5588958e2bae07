//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::compliance::mode::RFC6265;
use crate::compliance::ViolationKind;

/// Root configuration for the compliance server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Compliance mode selection and custom modes.
    pub compliance: ComplianceConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Where the HTTP endpoint listens.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Socket address, "0.0.0.0:8080" by default.
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for one request, in seconds. Must be non-zero.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Compliance configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ComplianceConfig {
    /// Name of the active mode (built-in or custom).
    pub mode: String,

    /// Expose tolerated violations to the handler and in responses.
    pub record_violations: bool,

    /// Extra modes registered next to the built-ins.
    pub modes: Vec<CustomModeConfig>,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            mode: RFC6265.to_string(),
            record_violations: true,
            modes: Vec::new(),
        }
    }
}

/// A custom compliance mode.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomModeConfig {
    /// Unique mode name.
    pub name: String,

    /// Violation kinds this mode tolerates.
    #[serde(default)]
    pub tolerate: Vec<ViolationKind>,
}

/// Logging and metrics.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Level applied to the `header_compliance` and `tower_http` targets.
    /// `RUST_LOG` overrides it.
    pub log_level: String,

    /// Serve Prometheus counters.
    pub metrics_enabled: bool,

    /// Scrape endpoint address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
