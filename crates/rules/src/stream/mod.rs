//! Stream validation: dispatch each reading to its signal's rules.
//!
//! For every reading, only the rules whose value type equals the reading's
//! declared type fire; readings for unknown signals are skipped. Failed
//! checks either abort the stream ([`FailureMode::FailFast`]) or are
//! collected in encounter order ([`FailureMode::Collect`]). Malformed input
//! is fatal in both modes.

mod report;

#[cfg(test)]
mod tests;

use rayon::prelude::*;
use sigrule_core::Reading;
use tracing::{debug, warn};

use crate::error::Result;
use crate::store::{RuleMap, RuleStore};

pub use self::report::{Failure, ValidationReport};

/// How failed checks propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Return the first failed check and stop processing the stream.
    FailFast,
    /// Record every failed check and keep going.
    #[default]
    Collect,
}

impl From<bool> for FailureMode {
    /// Maps a `raise_on_error` flag.
    fn from(raise_on_error: bool) -> Self {
        if raise_on_error {
            FailureMode::FailFast
        } else {
            FailureMode::Collect
        }
    }
}

/// Validates reading streams against a [`RuleStore`].
///
/// Each call holds the store's read lock for its whole traversal, so no
/// add/clear/load can interleave with it.
#[derive(Debug, Clone)]
pub struct StreamValidator {
    store: RuleStore,
}

impl StreamValidator {
    pub fn new(store: &RuleStore) -> Self {
        Self {
            store: store.clone(),
        }
    }

    /// Validate `readings` in order.
    ///
    /// In fail-fast mode the first failed check is returned as
    /// [`crate::RuleError::Validation`]. In collect mode failures land in the
    /// report and the call only errors on malformed input.
    pub fn validate<'r, I>(&self, readings: I, mode: FailureMode) -> Result<ValidationReport>
    where
        I: IntoIterator<Item = &'r Reading>,
    {
        let rules = self.store.read();
        let mut report = ValidationReport::default();
        for reading in readings {
            report.absorb(check_reading(&rules, reading, mode)?);
        }
        debug!(
            readings = report.readings,
            skipped = report.skipped,
            checks = report.checks,
            failures = report.failures.len(),
            "validated reading stream"
        );
        Ok(report)
    }

    /// Collect-mode validation on the rayon pool.
    ///
    /// Failures are reported in input order. If any reading is malformed,
    /// the error of the first such reading in input order is returned.
    pub fn validate_parallel(&self, readings: &[Reading]) -> Result<ValidationReport> {
        let guard = self.store.read();
        let rules: &RuleMap = &guard;

        let outcomes: Vec<Result<ReadingOutcome>> = readings
            .par_iter()
            .map(|reading| check_reading(rules, reading, FailureMode::Collect))
            .collect();

        let mut report = ValidationReport::default();
        for outcome in outcomes {
            report.absorb(outcome?);
        }
        debug!(
            readings = report.readings,
            failures = report.failures.len(),
            "validated reading stream in parallel"
        );
        Ok(report)
    }
}

/// What validating a single reading produced.
#[derive(Debug, Default)]
pub(crate) struct ReadingOutcome {
    pub(crate) skipped: bool,
    pub(crate) checks: usize,
    pub(crate) failures: Vec<Failure>,
}

fn check_reading(rules: &RuleMap, reading: &Reading, mode: FailureMode) -> Result<ReadingOutcome> {
    let mut outcome = ReadingOutcome::default();

    let Some(signal_rules) = rules.get(&reading.signal) else {
        debug!(signal = %reading.signal, "no rules for signal, skipping reading");
        outcome.skipped = true;
        return Ok(outcome);
    };

    for rule in signal_rules
        .iter()
        .filter(|rule| rule.value_type() == reading.value_type)
    {
        outcome.checks += 1;
        match rule.validate(&reading.value) {
            Ok(()) => {}
            Err(e) if e.is_validation() => {
                warn!(signal = %reading.signal, error = %e, "reading failed rule");
                match mode {
                    FailureMode::FailFast => return Err(e),
                    FailureMode::Collect => outcome.failures.push(Failure {
                        signal: reading.signal.clone(),
                        message: e.to_string(),
                    }),
                }
            }
            Err(e) => {
                warn!(signal = %reading.signal, error = %e, "malformed reading or rule");
                return Err(e);
            }
        }
    }

    Ok(outcome)
}
