use sigrule_core::ValueType;

use super::{check, TypeValidator};
use crate::error::Result;
use crate::schema::Operator;

/// Literal text comparison.
pub struct StringValidator;

impl TypeValidator for StringValidator {
    const VALUE_TYPE: ValueType = ValueType::String;
    type Value = String;

    fn convert(raw: &str) -> Result<String> {
        Ok(raw.to_string())
    }

    /// Only Match and NotEqual can fail; every other operator passes.
    fn evaluate(operator: Operator, expected: &String, raw: &str) -> Result<()> {
        match operator {
            Operator::Match => check(expected == raw, || {
                format!("Signal must be {} was {}", expected, raw)
            }),
            Operator::NotEqual => check(expected != raw, || {
                format!("Signal must not be {} was {}", expected, raw)
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(operator: Operator, expected: &str, raw: &str) -> Result<()> {
        StringValidator::evaluate(operator, &expected.to_string(), raw)
    }

    #[test]
    fn convert_is_identity() {
        assert_eq!(StringValidator::convert(" HIGH ").unwrap(), " HIGH ");
        assert_eq!(StringValidator::convert("").unwrap(), "");
    }

    #[test]
    fn match_requires_equality() {
        assert!(eval(Operator::Match, "HIGH", "HIGH").is_ok());
        let err = eval(Operator::Match, "HIGH", "LOW").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Signal must be HIGH was LOW");
    }

    #[test]
    fn not_equal_requires_difference() {
        assert!(eval(Operator::NotEqual, "LOW", "HIGH").is_ok());
        let err = eval(Operator::NotEqual, "LOW", "LOW").unwrap_err();
        assert_eq!(err.to_string(), "Signal must not be LOW was LOW");
    }

    #[test]
    fn other_operators_always_pass() {
        for op in [
            Operator::LessThan,
            Operator::GreaterThan,
            Operator::LessOrEqual,
            Operator::GreaterOrEqual,
            Operator::NotInFuture,
            Operator::NotInPast,
        ] {
            assert!(eval(op, "HIGH", "LOW").is_ok(), "{op} should pass");
            assert!(eval(op, "HIGH", "HIGH").is_ok(), "{op} should pass");
        }
    }
}
