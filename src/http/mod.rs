//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → request.rs (extract Host and Cookie values)
//!     → compliance::evaluate (reject with 400, or proceed)
//!     → server.rs cookie_handler
//!     → response.rs (properties body, violation count header)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{raw_headers, MakeRequestUuidV4, X_REQUEST_ID};
pub use response::{parse_properties, ComplianceReport, X_COMPLIANCE_VIOLATIONS};
pub use server::{AppState, HttpServer};
