//! Per-request violation collector.

use crate::compliance::violation::Violation;

/// Ordered list of the violations tolerated while processing one request.
///
/// Owned by exactly one request; handed to the report at the end.
#[derive(Debug, Default)]
pub struct ViolationRecorder {
    violations: Vec<Violation>,
}

impl ViolationRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, violation: Violation) {
        tracing::debug!(
            kind = %violation.kind,
            detail = %violation.detail,
            "Compliance violation recorded"
        );
        self.violations.push(violation);
    }

    /// Recorded violations in detection order.
    pub fn all(&self) -> &[Violation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}
