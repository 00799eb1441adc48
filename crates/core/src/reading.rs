use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Value type a rule checks against and a reading claims to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    String,
    Integer,
    Datetime,
}

impl ValueType {
    pub const ALL: [ValueType; 3] = [ValueType::String, ValueType::Integer, ValueType::Datetime];
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::String => write!(f, "String"),
            ValueType::Integer => write!(f, "Integer"),
            ValueType::Datetime => write!(f, "Datetime"),
        }
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "String" => Ok(ValueType::String),
            "Integer" => Ok(ValueType::Integer),
            "Datetime" => Ok(ValueType::Datetime),
            other => Err(format!("unknown value type: '{}'", other)),
        }
    }
}

/// One observed value for a signal, tagged with the type it claims to carry.
///
/// Readings are transient: they are validated and dropped, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub signal: String,
    pub value_type: ValueType,
    pub value: String,
}

impl Reading {
    pub fn new(signal: impl Into<String>, value_type: ValueType, value: impl Into<String>) -> Self {
        Self {
            signal: signal.into(),
            value_type,
            value: value.into(),
        }
    }
}
