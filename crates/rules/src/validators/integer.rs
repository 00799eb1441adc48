use sigrule_core::ValueType;

use super::{check, TypeValidator};
use crate::error::{Result, RuleError};
use crate::schema::Operator;

/// Numeric comparison. Values are parsed as `f64` despite the type's name.
pub struct IntegerValidator;

impl TypeValidator for IntegerValidator {
    const VALUE_TYPE: ValueType = ValueType::Integer;
    type Value = f64;

    fn convert(raw: &str) -> Result<f64> {
        raw.trim()
            .parse::<f64>()
            .map_err(|e| RuleError::conversion(Self::VALUE_TYPE, raw, e.to_string()))
    }

    fn evaluate(operator: Operator, expected: &f64, raw: &str) -> Result<()> {
        let expected = *expected;
        let value = Self::convert(raw)?;
        match operator {
            Operator::Match => check(value == expected, || {
                format!("Signal must be {} NOT {}", expected, raw)
            }),
            Operator::NotEqual => check(value != expected, || {
                format!("Signal must not be {} NOT {}", expected, raw)
            }),
            Operator::GreaterThan => check(value > expected, || {
                format!("Signal must be greater than {} NOT {}", expected, raw)
            }),
            Operator::LessThan => check(value < expected, || {
                format!("Signal must be less than {} NOT {}", expected, raw)
            }),
            Operator::GreaterOrEqual => check(value >= expected, || {
                format!("Signal must be greater or equal to {} NOT {}", expected, raw)
            }),
            Operator::LessOrEqual => check(value <= expected, || {
                format!("Signal must be less than or equal to {} NOT {}", expected, raw)
            }),
            Operator::NotInFuture | Operator::NotInPast => Err(RuleError::UnsupportedOperator {
                value_type: Self::VALUE_TYPE,
                operator,
            }),
        }
    }
}
