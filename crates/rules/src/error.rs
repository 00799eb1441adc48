//! Error type shared by rule construction, snapshot I/O and stream validation.

use sigrule_core::ValueType;

use crate::schema::Operator;

/// Errors raised while building rules, persisting them, or validating readings.
///
/// Only [`RuleError::Validation`] is a validation *outcome*; every other
/// variant means the input or the rule itself is malformed and is always
/// propagated, regardless of the caller's failure mode.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Raw text could not be converted to the declared value type.
    #[error("cannot convert '{raw}' to {value_type}: {reason}")]
    Conversion {
        value_type: ValueType,
        raw: String,
        reason: String,
    },

    /// The value converted but failed the rule's check.
    #[error("{0}")]
    Validation(String),

    /// The operator has no meaning for the rule's value type.
    #[error("operator '{operator}' is not supported for {value_type} rules")]
    UnsupportedOperator {
        value_type: ValueType,
        operator: Operator,
    },

    /// A comparison operator was paired with an empty expected value.
    #[error("operator '{operator}' requires an expected value")]
    MissingExpected { operator: Operator },

    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON snapshot parse/serialize error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML snapshot parse/serialize error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Filesystem watcher error.
    #[error("Notify watcher error: {0}")]
    Watch(#[from] notify::Error),
}

impl RuleError {
    pub(crate) fn conversion(
        value_type: ValueType,
        raw: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RuleError::Conversion {
            value_type,
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    /// True for a failed check, false for malformed input or I/O trouble.
    pub fn is_validation(&self) -> bool {
        matches!(self, RuleError::Validation(_))
    }

    pub fn is_conversion(&self) -> bool {
        matches!(self, RuleError::Conversion { .. })
    }
}

/// Result alias for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;
