//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config, overridable through `RUST_LOG`
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over the configured level when set

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directives for a configured level.
pub fn default_directives(level: &str) -> String {
    format!("header_compliance={level},tower_http={level}")
}

/// Install the global subscriber. Call once, from `main`.
pub fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
