//! Flattened rule record as stored in a snapshot.

use serde::{Deserialize, Deserializer, Serialize};
use sigrule_core::ValueType;

use super::Operator;

/// One persisted rule: `{signal_id, type, operator, test_data}`.
///
/// `source_id` is accepted as an alias for `signal_id` on input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleRecord {
    #[serde(alias = "source_id")]
    pub signal_id: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub operator: Operator,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub test_data: TestData,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TestData, D::Error> {
    Ok(Option::<TestData>::deserialize(deserializer)?.unwrap_or_default())
}

impl RuleRecord {
    pub fn new(
        signal_id: impl Into<String>,
        value_type: ValueType,
        operator: Operator,
        test_data: impl Into<TestData>,
    ) -> Self {
        Self {
            signal_id: signal_id.into(),
            value_type,
            operator,
            test_data: test_data.into(),
        }
    }
}

/// Expected value as written in a snapshot: a bare number or text.
///
/// Empty text stands for "no expected value" (NotInPast/NotInFuture).
/// A `null` in a snapshot reads as empty text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TestData {
    Number(f64),
    Text(String),
}

impl TestData {
    /// Raw text handed to the value type's converter.
    pub fn to_raw(&self) -> String {
        match self {
            TestData::Number(n) => n.to_string(),
            TestData::Text(s) => s.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TestData::Text(s) if s.is_empty())
    }
}

impl Default for TestData {
    fn default() -> Self {
        TestData::Text(String::new())
    }
}

impl From<&str> for TestData {
    fn from(s: &str) -> Self {
        TestData::Text(s.to_string())
    }
}

impl From<String> for TestData {
    fn from(s: String) -> Self {
        TestData::Text(s)
    }
}

/// Non-finite numbers become text (`inf`, `-inf`, `NaN`); JSON has no
/// literal for them.
impl From<f64> for TestData {
    fn from(n: f64) -> Self {
        if n.is_finite() {
            TestData::Number(n)
        } else {
            TestData::Text(n.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_legacy_source_id_and_numeric_test_data() {
        let record: RuleRecord = serde_json::from_str(
            r#"{"source_id": "ATL5", "type": "Integer", "operator": "<", "test_data": 25.5}"#,
        )
        .unwrap();
        assert_eq!(record.signal_id, "ATL5");
        assert_eq!(record.value_type, ValueType::Integer);
        assert_eq!(record.operator, Operator::LessThan);
        assert_eq!(record.test_data, TestData::Number(25.5));
        assert_eq!(record.test_data.to_raw(), "25.5");
    }

    #[test]
    fn missing_test_data_defaults_to_empty() {
        let record: RuleRecord = serde_json::from_str(
            r#"{"signal_id": "ATL1", "type": "Datetime", "operator": "nip"}"#,
        )
        .unwrap();
        assert!(record.test_data.is_empty());
    }

    #[test]
    fn null_test_data_reads_as_empty() {
        let record: RuleRecord = serde_json::from_str(
            r#"{"source_id": "ATL1", "type": "Datetime", "operator": "nif", "test_data": null}"#,
        )
        .unwrap();
        assert_eq!(record.test_data, TestData::default());
    }

    #[test]
    fn non_finite_numbers_are_kept_as_text() {
        assert_eq!(TestData::from(f64::INFINITY), TestData::from("inf"));
        assert_eq!(TestData::from(f64::NEG_INFINITY), TestData::from("-inf"));
        assert_eq!(TestData::from(f64::NAN), TestData::from("NaN"));
        assert_eq!(TestData::from(25.5), TestData::Number(25.5));
    }

    #[test]
    fn serializes_with_snapshot_field_names() {
        let record = RuleRecord::new("ATL2", ValueType::String, Operator::Match, "HIGH");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "signal_id": "ATL2",
                "type": "String",
                "operator": "=",
                "test_data": "HIGH",
            })
        );
    }
}
