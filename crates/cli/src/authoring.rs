//! Rule authoring checks.
//!
//! The rule store accepts any operator/type pairing; this is the layer that
//! only offers the legal set per type and refuses blank or unconvertible
//! expected values before anything is persisted.

use anyhow::{bail, Result};
use sigrule_core::ValueType;
use sigrule_rules::{Expected, Operator, RuleRecord, TestData};

const STRING_LABELS: &[(Operator, &str)] = &[
    (Operator::Match, "Match"),
    (Operator::NotEqual, "Must not match"),
];

const INTEGER_LABELS: &[(Operator, &str)] = &[
    (Operator::Match, "EqualTo"),
    (Operator::NotEqual, "NotEqualsTo"),
    (Operator::LessThan, "LessThan"),
    (Operator::GreaterThan, "GreaterThan"),
    (Operator::LessOrEqual, "LessThanEqual"),
    (Operator::GreaterOrEqual, "GreaterThanEqual"),
];

const DATETIME_LABELS: &[(Operator, &str)] = &[
    (Operator::NotInFuture, "NotInFuture"),
    (Operator::NotInPast, "NotInPast"),
    (Operator::LessThan, "BeforeDate"),
    (Operator::GreaterThan, "AfterDate"),
];

/// Legal operators for `value_type` with their menu labels.
pub fn operator_labels(value_type: ValueType) -> &'static [(Operator, &'static str)] {
    match value_type {
        ValueType::String => STRING_LABELS,
        ValueType::Integer => INTEGER_LABELS,
        ValueType::Datetime => DATETIME_LABELS,
    }
}

/// Resolve a symbol or menu label to an operator legal for `value_type`.
pub fn resolve_operator(value_type: ValueType, input: &str) -> Result<Operator> {
    let input = input.trim();
    let labels = operator_labels(value_type);

    let operator = match input.parse::<Operator>() {
        Ok(op) => op,
        Err(_) => match labels.iter().find(|(_, label)| label.eq_ignore_ascii_case(input)) {
            Some((op, _)) => *op,
            None => bail!("unknown operator '{}' for {} rules", input, value_type),
        },
    };

    if !operator.is_legal_for(value_type) {
        let choices: Vec<String> = labels
            .iter()
            .map(|(op, label)| format!("{} ({})", op, label))
            .collect();
        bail!(
            "operator '{}' is not available for {} rules; choose one of: {}",
            operator,
            value_type,
            choices.join(", ")
        );
    }
    Ok(operator)
}

/// Build a record that the rule store is guaranteed to accept.
pub fn prepare_rule(
    signal: &str,
    value_type: ValueType,
    operator: &str,
    value: Option<&str>,
) -> Result<RuleRecord> {
    let signal = signal.trim();
    if signal.is_empty() {
        bail!("signal name must not be blank");
    }
    let operator = resolve_operator(value_type, operator)?;

    if operator.ignores_expected() {
        if value.is_some_and(|v| !v.is_empty()) {
            tracing::warn!(%operator, "expected value is ignored for temporal operators");
        }
        return Ok(RuleRecord::new(signal, value_type, operator, TestData::default()));
    }

    let value = value.unwrap_or_default();
    if value.is_empty() {
        bail!("operator '{}' needs a test value", operator);
    }

    let test_data = match Expected::convert(value_type, value) {
        Ok(Expected::Number(n)) => TestData::from(n),
        Ok(_) => TestData::from(value),
        Err(e) if value_type == ValueType::Datetime => {
            bail!("{}; enter the date as YYYY-MM-DD HH:MM:SS", e)
        }
        Err(e) => return Err(e.into()),
    };
    Ok(RuleRecord::new(signal, value_type, operator, test_data))
}
