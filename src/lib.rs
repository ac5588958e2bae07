//! HTTP header compliance engine.
//!
//! Parses `Cookie` headers with a table-driven state machine and validates
//! `Host` headers, tolerating or rejecting each deviation according to the
//! active [`compliance::ComplianceMode`].

// Engine
pub mod compliance;
pub mod cookie;
pub mod host;

// Service
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use compliance::{evaluate, ComplianceMode, Outcome, RawHeaders, ViolationKind};
pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
