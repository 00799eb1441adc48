use std::fmt;

use serde::Serialize;

use super::ReadingOutcome;

/// A failed check captured in collect mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub signal: String,
    pub message: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.signal, self.message)
    }
}

/// Result of validating a whole stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Failed checks in encounter order.
    pub failures: Vec<Failure>,
    /// Readings processed.
    pub readings: usize,
    /// Readings whose signal had no rules.
    pub skipped: usize,
    /// Rule evaluations performed.
    pub checks: usize,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(super) fn absorb(&mut self, outcome: ReadingOutcome) {
        self.readings += 1;
        if outcome.skipped {
            self.skipped += 1;
        }
        self.checks += outcome.checks;
        self.failures.extend(outcome.failures);
    }
}
