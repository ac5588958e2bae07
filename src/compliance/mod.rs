//! Compliance policy subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     built-in modes + [[compliance.modes]] from config
//!     → registry.rs (ModeRegistryBuilder::register)
//!     → ModeRegistry (frozen, lookups only)
//!     → Arc<ComplianceMode> selected once, shared by every request
//!
//! Per request:
//!     RawHeaders (Host values, Cookie value)
//!     → orchestrator.rs
//!         → host::validate_with   (may reject the request)
//!         → cookie::parse_with    (drops pairs, never rejects)
//!     → recorder.rs collects tolerated violations in detection order
//!     → Outcome::Proceed / Outcome::Reject
//! ```
//!
//! # Design Decisions
//! - A mode is data: a name and a set of tolerated kinds
//! - Modes never change after startup; no locking on the request path
//! - Only tolerated violations are recorded; intolerant ones drop or reject

pub mod mode;
pub mod orchestrator;
pub mod recorder;
pub mod registry;
pub mod violation;

pub use mode::ComplianceMode;
pub use orchestrator::{evaluate, Authority, Outcome, RawHeaders, Rejection, RequestCompliance};
pub use recorder::ViolationRecorder;
pub use registry::{ModeRegistry, ModeRegistryBuilder, RegistryError};
pub use violation::{Category, UnknownViolationKind, Violation, ViolationKind};
