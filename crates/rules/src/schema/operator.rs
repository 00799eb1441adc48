//! Comparison operators and the per-type legality table.

use serde::{Deserialize, Serialize};
use sigrule_core::ValueType;
use std::fmt;
use std::str::FromStr;

/// Comparison operator of a rule, persisted by its symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Match,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "nif")]
    NotInFuture,
    #[serde(rename = "nip")]
    NotInPast,
}

const STRING_OPERATORS: &[Operator] = &[Operator::Match, Operator::NotEqual];

const INTEGER_OPERATORS: &[Operator] = &[
    Operator::Match,
    Operator::NotEqual,
    Operator::LessThan,
    Operator::GreaterThan,
    Operator::LessOrEqual,
    Operator::GreaterOrEqual,
];

const DATETIME_OPERATORS: &[Operator] = &[
    Operator::NotInFuture,
    Operator::NotInPast,
    Operator::LessThan,
    Operator::GreaterThan,
];

impl Operator {
    pub const ALL: [Operator; 8] = [
        Operator::Match,
        Operator::NotEqual,
        Operator::LessThan,
        Operator::GreaterThan,
        Operator::LessOrEqual,
        Operator::GreaterOrEqual,
        Operator::NotInFuture,
        Operator::NotInPast,
    ];

    /// Wire symbol used in snapshots.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Match => "=",
            Operator::NotEqual => "!=",
            Operator::LessThan => "<",
            Operator::GreaterThan => ">",
            Operator::LessOrEqual => "<=",
            Operator::GreaterOrEqual => ">=",
            Operator::NotInFuture => "nif",
            Operator::NotInPast => "nip",
        }
    }

    /// Operators an authoring surface may offer for `value_type`, in menu order.
    pub fn legal_for(value_type: ValueType) -> &'static [Operator] {
        match value_type {
            ValueType::String => STRING_OPERATORS,
            ValueType::Integer => INTEGER_OPERATORS,
            ValueType::Datetime => DATETIME_OPERATORS,
        }
    }

    pub fn is_legal_for(&self, value_type: ValueType) -> bool {
        Self::legal_for(value_type).contains(self)
    }

    /// NotInPast/NotInFuture compare against the clock, never the rule's value.
    pub fn ignores_expected(&self) -> bool {
        matches!(self, Operator::NotInPast | Operator::NotInFuture)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| format!("unknown operator: '{}'", s))
    }
}
