//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build mode registry → Resolve mode → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Broadcast fired → axum stops accepting → In-flight requests finish → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then compliance mode, then listener
//! - No reload: the compliance mode is fixed at startup

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{build_registry, resolve_mode, StartupError};
