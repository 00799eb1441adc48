use chrono::{Local, NaiveDateTime};
use sigrule_core::ValueType;

use super::{check, TypeValidator};
use crate::error::{Result, RuleError};
use crate::schema::Operator;

/// Fixed literal format of datetime values: 24-hour clock, no timezone.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Instant comparison, either against the rule's instant or the wall clock.
///
/// Instants are naive local time. An empty string converts to `None`, which
/// is only meaningful as the expected value of NotInPast/NotInFuture rules.
pub struct DatetimeValidator;

impl DatetimeValidator {
    /// Evaluate against an explicit "now". [`TypeValidator::evaluate`] samples
    /// the local clock on every call and delegates here.
    pub fn evaluate_at(
        operator: Operator,
        expected: &Option<NaiveDateTime>,
        raw: &str,
        now: NaiveDateTime,
    ) -> Result<()> {
        let value = Self::convert(raw)?
            .ok_or_else(|| RuleError::conversion(Self::VALUE_TYPE, raw, "reading has no instant"))?;

        match operator {
            Operator::NotInPast => check(value >= now, || {
                format!("Date must not be in past WAS {}", value)
            }),
            Operator::NotInFuture => check(value <= now, || {
                format!("Date must not be in future WAS {}", value)
            }),
            Operator::GreaterThan => {
                let expected = expected.ok_or(RuleError::MissingExpected { operator })?;
                check(value > expected, || {
                    format!("Date must be after {} NOT {}", expected, value)
                })
            }
            Operator::LessThan => {
                let expected = expected.ok_or(RuleError::MissingExpected { operator })?;
                check(value < expected, || {
                    format!("Date must be before {} NOT {}", expected, value)
                })
            }
            _ => Err(RuleError::UnsupportedOperator {
                value_type: Self::VALUE_TYPE,
                operator,
            }),
        }
    }
}

impl TypeValidator for DatetimeValidator {
    const VALUE_TYPE: ValueType = ValueType::Datetime;
    type Value = Option<NaiveDateTime>;

    fn convert(raw: &str) -> Result<Option<NaiveDateTime>> {
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
            .map(Some)
            .map_err(|e| RuleError::conversion(Self::VALUE_TYPE, raw, e.to_string()))
    }

    fn evaluate(operator: Operator, expected: &Option<NaiveDateTime>, raw: &str) -> Result<()> {
        Self::evaluate_at(operator, expected, raw, Local::now().naive_local())
    }
}
