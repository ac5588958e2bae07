//! Compliance modes: named sets of tolerated violation kinds.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::compliance::violation::ViolationKind;

/// Strict baseline: tolerates nothing.
pub const RFC6265: &str = "RFC6265";

/// Tolerates the cookie quoting and naming deviations seen from real clients.
pub const RFC6265_WITH_VIOLATIONS: &str = "RFC6265_WITH_VIOLATIONS";

/// Tolerates every known violation kind.
pub const LEGACY: &str = "LEGACY";

/// An immutable, named compliance policy.
///
/// A mode only answers one question: is a given [`ViolationKind`] tolerated?
/// The grammar used by the parsers never changes between modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceMode {
    name: String,
    tolerated: BTreeSet<ViolationKind>,
}

impl ComplianceMode {
    pub fn new(name: impl Into<String>, tolerated: impl IntoIterator<Item = ViolationKind>) -> Self {
        Self {
            name: name.into(),
            tolerated: tolerated.into_iter().collect(),
        }
    }

    /// A mode that tolerates nothing.
    pub fn strict(name: impl Into<String>) -> Self {
        Self::new(name, [])
    }

    /// Derive a new mode tolerating everything this one does plus `extra`.
    pub fn with(&self, name: impl Into<String>, extra: impl IntoIterator<Item = ViolationKind>) -> Self {
        let mut tolerated = self.tolerated.clone();
        tolerated.extend(extra);
        Self {
            name: name.into(),
            tolerated,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tolerates(&self, kind: ViolationKind) -> bool {
        self.tolerated.contains(&kind)
    }

    /// Tolerated kinds in canonical order.
    pub fn tolerated(&self) -> impl Iterator<Item = ViolationKind> + '_ {
        self.tolerated.iter().copied()
    }

    pub fn is_strict(&self) -> bool {
        self.tolerated.is_empty()
    }
}

impl fmt::Display for ComplianceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.name)?;
        for (i, kind) in self.tolerated.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", kind)?;
        }
        f.write_str("]")
    }
}

/// The modes every registry starts with.
pub fn builtin_modes() -> Vec<ComplianceMode> {
    let strict = ComplianceMode::strict(RFC6265);
    let with_violations = strict.with(
        RFC6265_WITH_VIOLATIONS,
        [
            ViolationKind::EscapeInQuotes,
            ViolationKind::BadQuotes,
            ViolationKind::SpecialCharsInQuotes,
            ViolationKind::InvalidCookies,
        ],
    );
    let legacy = ComplianceMode::new(LEGACY, ViolationKind::ALL);
    vec![strict, with_violations, legacy]
}
