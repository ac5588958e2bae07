//! Violation kinds and recorded violations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A named class of deviation from the strict header grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    /// `\(` or `\)` inside a quoted cookie value.
    EscapeInQuotes,
    /// Unbalanced or misplaced quotes in a cookie value.
    BadQuotes,
    /// A comma inside a quoted cookie value.
    SpecialCharsInQuotes,
    /// A cookie name outside the token charset, or a pair without `=`.
    InvalidCookies,
    /// More than one `Host` header on a request.
    DuplicateHostHeaders,
    /// A `Host` header that is not a well-formed authority.
    UnsafeHostHeader,
}

/// Which header grammar a violation kind belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cookie,
    Http,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cookie => "cookie",
            Category::Http => "http",
        }
    }
}

impl ViolationKind {
    pub const ALL: [ViolationKind; 6] = [
        ViolationKind::EscapeInQuotes,
        ViolationKind::BadQuotes,
        ViolationKind::SpecialCharsInQuotes,
        ViolationKind::InvalidCookies,
        ViolationKind::DuplicateHostHeaders,
        ViolationKind::UnsafeHostHeader,
    ];

    /// Canonical name used in config files, logs, metrics and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::EscapeInQuotes => "ESCAPE_IN_QUOTES",
            ViolationKind::BadQuotes => "BAD_QUOTES",
            ViolationKind::SpecialCharsInQuotes => "SPECIAL_CHARS_IN_QUOTES",
            ViolationKind::InvalidCookies => "INVALID_COOKIES",
            ViolationKind::DuplicateHostHeaders => "DUPLICATE_HOST_HEADERS",
            ViolationKind::UnsafeHostHeader => "UNSAFE_HOST_HEADER",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            ViolationKind::DuplicateHostHeaders | ViolationKind::UnsafeHostHeader => Category::Http,
            _ => Category::Cookie,
        }
    }

    /// Short human-readable description of the kind.
    pub fn description(&self) -> &'static str {
        match self {
            ViolationKind::EscapeInQuotes => "escaped character in quoted cookie value",
            ViolationKind::BadQuotes => "bad quotes in cookie value",
            ViolationKind::SpecialCharsInQuotes => "special character in quoted cookie value",
            ViolationKind::InvalidCookies => "invalid cookie",
            ViolationKind::DuplicateHostHeaders => "duplicate Host headers",
            ViolationKind::UnsafeHostHeader => "unsafe Host header",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a violation kind name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown violation kind: {0}")]
pub struct UnknownViolationKind(pub String);

impl FromStr for ViolationKind {
    type Err = UnknownViolationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ViolationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownViolationKind(s.to_string()))
    }
}

/// A detected deviation, with context for the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub detail: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in ViolationKind::ALL {
            assert_eq!(kind.as_str().parse::<ViolationKind>().unwrap(), kind);
        }
        assert_eq!(
            "bad_quotes".parse::<ViolationKind>().unwrap(),
            ViolationKind::BadQuotes
        );
    }

    #[test]
    fn test_unknown_kind() {
        let err = "NO_SUCH_THING".parse::<ViolationKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown violation kind: NO_SUCH_THING");
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let json = serde_json::to_string(&ViolationKind::SpecialCharsInQuotes).unwrap();
        assert_eq!(json, "\"SPECIAL_CHARS_IN_QUOTES\"");
        let kind: ViolationKind = serde_json::from_str("\"UNSAFE_HOST_HEADER\"").unwrap();
        assert_eq!(kind, ViolationKind::UnsafeHostHeader);
    }

    #[test]
    fn test_categories() {
        assert_eq!(ViolationKind::BadQuotes.category(), Category::Cookie);
        assert_eq!(ViolationKind::DuplicateHostHeaders.category(), Category::Http);
        assert_eq!(Category::Http.as_str(), "http");
    }

    #[test]
    fn test_display() {
        let v = Violation::new(ViolationKind::BadQuotes, "unterminated quoted value");
        assert_eq!(v.to_string(), "BAD_QUOTES: unterminated quoted value");
    }
}
