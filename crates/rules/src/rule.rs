//! Immutable rule: operator plus a converted expected value.

use chrono::NaiveDateTime;
use sigrule_core::ValueType;

use crate::error::Result;
use crate::schema::{Operator, RuleRecord, TestData};
use crate::validators::{
    DatetimeValidator, IntegerValidator, StringValidator, TypeValidator, DATETIME_FORMAT,
};

/// Expected value converted by its type's validator.
///
/// The variant doubles as the rule's value type.
#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    Text(String),
    Number(f64),
    /// `None` for NotInPast/NotInFuture rules, which ignore it.
    Instant(Option<NaiveDateTime>),
}

impl Expected {
    /// Convert `raw` with the validator for `value_type`.
    pub fn convert(value_type: ValueType, raw: &str) -> Result<Self> {
        Ok(match value_type {
            ValueType::String => Expected::Text(StringValidator::convert(raw)?),
            ValueType::Integer => Expected::Number(IntegerValidator::convert(raw)?),
            ValueType::Datetime => Expected::Instant(DatetimeValidator::convert(raw)?),
        })
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Expected::Text(_) => ValueType::String,
            Expected::Number(_) => ValueType::Integer,
            Expected::Instant(_) => ValueType::Datetime,
        }
    }

    /// Snapshot representation: finite numbers stay numeric, instants use the
    /// fixed datetime format, an absent instant becomes empty text.
    pub fn to_test_data(&self) -> TestData {
        match self {
            Expected::Text(s) => TestData::Text(s.clone()),
            Expected::Number(n) => TestData::from(*n),
            Expected::Instant(Some(t)) => TestData::Text(t.format(DATETIME_FORMAT).to_string()),
            Expected::Instant(None) => TestData::default(),
        }
    }
}

/// A single assertion about one value type of a signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    operator: Operator,
    expected: Expected,
}

impl Rule {
    /// Build a rule, converting `raw_expected` with the type's validator.
    ///
    /// Operator/type legality is not checked here; see [`Operator::is_legal_for`].
    pub fn new(value_type: ValueType, operator: Operator, raw_expected: &str) -> Result<Self> {
        Ok(Self {
            operator,
            expected: Expected::convert(value_type, raw_expected)?,
        })
    }

    pub fn from_record(record: &RuleRecord) -> Result<Self> {
        Self::new(record.value_type, record.operator, &record.test_data.to_raw())
    }

    pub fn value_type(&self) -> ValueType {
        self.expected.value_type()
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn expected(&self) -> &Expected {
        &self.expected
    }

    /// Check a raw reading value against this rule.
    pub fn validate(&self, raw: &str) -> Result<()> {
        match &self.expected {
            Expected::Text(e) => StringValidator::evaluate(self.operator, e, raw),
            Expected::Number(e) => IntegerValidator::evaluate(self.operator, e, raw),
            Expected::Instant(e) => DatetimeValidator::evaluate(self.operator, e, raw),
        }
    }

    /// Flatten back into a snapshot record for `signal_id`.
    pub fn to_record(&self, signal_id: &str) -> RuleRecord {
        RuleRecord::new(
            signal_id,
            self.value_type(),
            self.operator,
            self.expected.to_test_data(),
        )
    }
}
