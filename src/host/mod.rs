//! `Host` request header validation.
//!
//! # Responsibilities
//! - Require exactly one distinct `Host` value per request
//! - Parse the authority as `host[:port]`, including IP literals
//! - Reject, or tolerate and record, duplicate and unsafe values
//!
//! # Design Decisions
//! - Differing duplicates are never tolerated, whatever the mode
//! - A tolerated bad port is dropped rather than guessed

pub mod validator;

pub use validator::{validate, validate_with, HostValidationResult};
