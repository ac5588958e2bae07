//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → lifecycle::startup resolves the compliance mode
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the compliance mode is fixed for the process
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::ComplianceConfig;
pub use schema::CustomModeConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::ServerConfig;
pub use validation::ValidationError;
