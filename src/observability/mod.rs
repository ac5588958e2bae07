//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! compliance, http, lifecycle produce:
//!     → logging.rs (structured events, one span per request via TraceLayer)
//!     → metrics.rs (request, violation and rejection counters)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Every request carries an `x-request-id`, logged as a field
//! - Counters are labelled by violation kind, never by header content

pub mod logging;
pub mod metrics;
