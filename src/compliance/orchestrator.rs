//! Per-request compliance sequencing.
//!
//! Host validation runs first and can reject the whole request. Cookie
//! parsing only runs for accepted requests and never rejects: an intolerant
//! cookie violation drops just the offending pair.

use serde::Serialize;

use crate::compliance::{ComplianceMode, Violation, ViolationKind, ViolationRecorder};
use crate::cookie::{self, CookieParseResult};
use crate::host::{self, HostValidationResult};

/// The raw header values the engine needs from one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawHeaders {
    /// Every `Host` value as raw bytes, in arrival order.
    pub host: Vec<Vec<u8>>,
    /// The `Cookie` value, if the header was present.
    pub cookie: Option<String>,
}

/// The validated `host[:port]` of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Authority {
    pub host: String,
    pub port: Option<u16>,
}

/// What the handler receives for an accepted request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestCompliance {
    pub authority: Authority,
    pub cookies: CookieParseResult,
    /// Tolerated violations, Host first, then Cookie, each in detection order.
    pub violations: Vec<Violation>,
}

/// A request refused before reaching the handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub reason: ViolationKind,
    /// Violations tolerated before the fatal one.
    pub violations: Vec<Violation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Proceed(RequestCompliance),
    Reject(Rejection),
}

/// Run Host validation then Cookie parsing for one request.
pub fn evaluate(headers: &RawHeaders, mode: &ComplianceMode) -> Outcome {
    let mut recorder = ViolationRecorder::new();

    let authority = match host::validate_with(headers.host.as_slice(), mode, &mut recorder) {
        HostValidationResult::Accepted { host, port } => Authority { host, port },
        HostValidationResult::Rejected { reason } => {
            tracing::warn!(
                kind = %reason,
                mode = %mode.name(),
                host = ?headers.host.iter().map(|h| String::from_utf8_lossy(h)).collect::<Vec<_>>(),
                "Rejecting request"
            );
            return Outcome::Reject(Rejection {
                reason,
                violations: recorder.into_inner(),
            });
        }
    };

    let cookies = cookie::parse_with(headers.cookie.as_deref(), mode, &mut recorder);

    tracing::debug!(
        host = %authority.host,
        cookies = ?cookies.len(),
        violations = recorder.len(),
        "Request headers accepted"
    );

    Outcome::Proceed(RequestCompliance {
        authority,
        cookies,
        violations: recorder.into_inner(),
    })
}
