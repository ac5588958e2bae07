//! `Cookie` request header parsing.
//!
//! # Data Flow
//! ```text
//! raw header value (or absent)
//!     → parser.rs (scan characters left to right)
//!     → state.rs  (transition table: next state + action)
//!     → mode decides: tolerate (record, recover) or drop the pair
//!     → CookieParseResult + violations
//! ```
//!
//! # Design Decisions
//! - One grammar for every mode; modes only change tolerance
//! - Violations are per pair: a bad pair never spoils its neighbours
//! - A missing header (`NoHeader`) is distinct from an empty one

pub mod parser;
pub mod state;

pub use parser::{parse, parse_with, CookieParseResult, CookiePair};
