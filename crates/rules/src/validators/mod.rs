//! Type-polymorphic validators.
//!
//! Each [`ValueType`] variant has one [`TypeValidator`] implementation that
//! converts raw text into its typed value and evaluates an operator against
//! a rule's expected value. [`crate::rule::Expected`] dispatches to them by
//! matching on its variant.

mod datetime;
mod integer;
mod string;

pub use datetime::{DatetimeValidator, DATETIME_FORMAT};
pub use integer::IntegerValidator;
pub use string::StringValidator;

use sigrule_core::ValueType;

use crate::error::{Result, RuleError};
use crate::schema::Operator;

/// Conversion and evaluation for one value type.
pub trait TypeValidator {
    /// The value type this validator handles.
    const VALUE_TYPE: ValueType;

    /// Typed representation of a converted value.
    type Value;

    /// Convert raw text, failing with [`RuleError::Conversion`].
    fn convert(raw: &str) -> Result<Self::Value>;

    /// Convert `raw` and check it against `expected` under `operator`.
    ///
    /// Returns [`RuleError::Validation`] when the check fails; any other
    /// error means the reading or the rule is malformed.
    fn evaluate(operator: Operator, expected: &Self::Value, raw: &str) -> Result<()>;
}

/// Turn a failed check into a [`RuleError::Validation`] carrying `message`.
pub(crate) fn check(passed: bool, message: impl FnOnce() -> String) -> Result<()> {
    if passed {
        Ok(())
    } else {
        Err(RuleError::Validation(message()))
    }
}
