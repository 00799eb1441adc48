//! Tests for stream validation.

use chrono::{Duration, Local};
use sigrule_core::{Reading, ValueType};

use super::*;
use crate::schema::{Operator, RuleRecord};
use crate::validators::DATETIME_FORMAT;
use crate::RuleError;

fn days_from_now(days: i64) -> String {
    (Local::now().naive_local() + Duration::days(days))
        .format(DATETIME_FORMAT)
        .to_string()
}

fn store_with(records: &[RuleRecord]) -> RuleStore {
    let store = RuleStore::new();
    store.load(records).unwrap();
    store
}

fn validate(store: &RuleStore, readings: &[Reading], mode: FailureMode) -> Result<ValidationReport> {
    StreamValidator::new(store).validate(readings, mode)
}

// ── Scenarios ───────────────────────────────────────────────────────

#[test]
fn string_match_success() {
    let store = store_with(&[RuleRecord::new("ATL2", ValueType::String, Operator::Match, "HIGH")]);
    let readings = [Reading::new("ATL2", ValueType::String, "HIGH")];

    let report = validate(&store, &readings, FailureMode::FailFast).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.checks, 1);
}

#[test]
fn string_match_fail() {
    let store = store_with(&[RuleRecord::new("ATL2", ValueType::String, Operator::Match, "HIGH")]);
    let readings = [Reading::new("ATL2", ValueType::String, "LOW")];

    let err = validate(&store, &readings, FailureMode::FailFast).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn string_not_equal() {
    let store = store_with(&[RuleRecord::new("ATL10", ValueType::String, Operator::NotEqual, "LOW")]);

    let ok = [Reading::new("ATL10", ValueType::String, "HIGH")];
    assert!(validate(&store, &ok, FailureMode::FailFast).is_ok());

    let bad = [Reading::new("ATL10", ValueType::String, "LOW")];
    assert!(validate(&store, &bad, FailureMode::FailFast)
        .unwrap_err()
        .is_validation());
}

#[test]
fn not_in_past_fails_for_yesterday() {
    let store = store_with(&[RuleRecord::new("ATL1", ValueType::Datetime, Operator::NotInPast, "")]);
    let readings = [Reading::new("ATL1", ValueType::Datetime, days_from_now(-1))];

    let err = validate(&store, &readings, FailureMode::FailFast).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn temporal_operators_against_wall_clock() {
    let nif = store_with(&[RuleRecord::new("ATL1", ValueType::Datetime, Operator::NotInFuture, "")]);
    let nip = store_with(&[RuleRecord::new("ATL1", ValueType::Datetime, Operator::NotInPast, "")]);
    let past = [Reading::new("ATL1", ValueType::Datetime, days_from_now(-1))];
    let future = [Reading::new("ATL1", ValueType::Datetime, days_from_now(1))];

    assert!(validate(&nif, &past, FailureMode::FailFast).is_ok());
    assert!(validate(&nif, &future, FailureMode::FailFast).is_err());
    assert!(validate(&nip, &future, FailureMode::FailFast).is_ok());
    assert!(validate(&nip, &past, FailureMode::FailFast).is_err());
}

#[test]
fn multi_type_signal_only_fires_matching_rule() {
    let store = store_with(&[
        RuleRecord::new("ATL9", ValueType::Integer, Operator::Match, 5.534),
        RuleRecord::new("ATL9", ValueType::Datetime, Operator::NotInFuture, ""),
    ]);
    let readings = [
        Reading::new("ATL9", ValueType::Integer, "5.534"),
        Reading::new("ATL9", ValueType::Datetime, "2017-06-13 22:40:10"),
    ];

    // The Integer rule would reject the datetime text as malformed, and the
    // Datetime rule would reject "5.534"; neither is reached.
    let report = validate(&store, &readings, FailureMode::FailFast).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.checks, 2);
}

// ── Dispatch and propagation ────────────────────────────────────────

#[test]
fn unknown_signals_are_skipped() {
    let store = store_with(&[RuleRecord::new("ATL2", ValueType::String, Operator::Match, "HIGH")]);
    let readings = [
        Reading::new("ATL99", ValueType::Integer, "not even a number"),
        Reading::new("ATL2", ValueType::String, "HIGH"),
    ];

    let report = validate(&store, &readings, FailureMode::FailFast).unwrap();
    assert_eq!(report.readings, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.checks, 1);
}

#[test]
fn reading_type_without_rules_runs_no_checks() {
    let store = store_with(&[RuleRecord::new("ATL2", ValueType::String, Operator::Match, "HIGH")]);
    let readings = [Reading::new("ATL2", ValueType::Integer, "3")];

    let report = validate(&store, &readings, FailureMode::FailFast).unwrap();
    assert_eq!(report.checks, 0);
    assert_eq!(report.skipped, 0);
}

#[test]
fn collect_mode_gathers_failures_in_encounter_order() {
    let store = store_with(&[
        RuleRecord::new("ATL5", ValueType::Integer, Operator::LessThan, 25.5),
        RuleRecord::new("ATL5", ValueType::Integer, Operator::GreaterThan, 30.0),
        RuleRecord::new("ATL2", ValueType::String, Operator::Match, "HIGH"),
    ]);
    let readings = [
        Reading::new("ATL2", ValueType::String, "LOW"),
        Reading::new("ATL5", ValueType::Integer, "27"),
        Reading::new("ATL2", ValueType::String, "HIGH"),
        Reading::new("ATL2", ValueType::String, "MEDIUM"),
    ];

    let report = validate(&store, &readings, FailureMode::Collect).unwrap();
    let messages: Vec<String> = report.failures.iter().map(ToString::to_string).collect();
    assert_eq!(
        messages,
        vec![
            "ATL2: Signal must be HIGH was LOW",
            "ATL5: Signal must be less than 25.5 NOT 27",
            "ATL5: Signal must be greater than 30 NOT 27",
            "ATL2: Signal must be HIGH was MEDIUM",
        ]
    );
    assert_eq!(report.readings, 4);
    assert_eq!(report.checks, 5);
}

#[test]
fn fail_fast_stops_at_first_failure() {
    let store = store_with(&[
        RuleRecord::new("ATL2", ValueType::String, Operator::Match, "HIGH"),
        RuleRecord::new("ATL5", ValueType::Integer, Operator::Match, "1"),
    ]);
    // The second reading is malformed; fail-fast must return before reaching it.
    let readings = [
        Reading::new("ATL2", ValueType::String, "LOW"),
        Reading::new("ATL5", ValueType::Integer, "one"),
    ];

    let err = validate(&store, &readings, FailureMode::FailFast).unwrap_err();
    assert_eq!(err.to_string(), "Signal must be HIGH was LOW");
}

#[test]
fn conversion_errors_are_fatal_even_when_collecting() {
    let store = store_with(&[
        RuleRecord::new("ATL2", ValueType::String, Operator::Match, "HIGH"),
        RuleRecord::new("ATL5", ValueType::Integer, Operator::Match, "1"),
    ]);
    let readings = [
        Reading::new("ATL2", ValueType::String, "LOW"),
        Reading::new("ATL5", ValueType::Integer, "one"),
        Reading::new("ATL2", ValueType::String, "LOW"),
    ];

    let err = validate(&store, &readings, FailureMode::Collect).unwrap_err();
    assert!(err.is_conversion());
}

#[test]
fn unsupported_pairing_is_fatal_at_evaluation() {
    let store = RuleStore::new();
    store.add("ATL5", ValueType::Integer, Operator::NotInPast, "1").unwrap();
    let readings = [Reading::new("ATL5", ValueType::Integer, "1")];

    let err = validate(&store, &readings, FailureMode::Collect).unwrap_err();
    assert!(matches!(err, RuleError::UnsupportedOperator { .. }));
}

#[test]
fn raise_on_error_flag_maps_to_mode() {
    assert_eq!(FailureMode::from(true), FailureMode::FailFast);
    assert_eq!(FailureMode::from(false), FailureMode::Collect);
}

#[test]
fn parallel_matches_sequential() {
    let store = store_with(&[
        RuleRecord::new("ATL5", ValueType::Integer, Operator::LessOrEqual, 10.0),
        RuleRecord::new("ATL2", ValueType::String, Operator::NotEqual, "OFF"),
    ]);
    let readings: Vec<Reading> = (0..200)
        .map(|i| {
            if i % 3 == 0 {
                Reading::new("ATL2", ValueType::String, if i % 2 == 0 { "OFF" } else { "ON" })
            } else {
                Reading::new("ATL5", ValueType::Integer, (i % 20).to_string())
            }
        })
        .collect();

    let validator = StreamValidator::new(&store);
    let sequential = validator.validate(&readings, FailureMode::Collect).unwrap();
    let parallel = validator.validate_parallel(&readings).unwrap();
    assert_eq!(parallel, sequential);
    assert!(!parallel.is_clean());
}

#[test]
fn parallel_returns_first_fatal_error_in_input_order() {
    let store = store_with(&[RuleRecord::new("ATL5", ValueType::Integer, Operator::Match, "1")]);
    let readings = [
        Reading::new("ATL5", ValueType::Integer, "1"),
        Reading::new("ATL5", ValueType::Integer, "first"),
        Reading::new("ATL5", ValueType::Integer, "second"),
    ];

    let err = StreamValidator::new(&store)
        .validate_parallel(&readings)
        .unwrap_err();
    assert!(matches!(err, RuleError::Conversion { ref raw, .. } if raw == "first"));
}
