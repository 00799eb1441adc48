//! Wire-level types: operators and the flattened rule record.
//!
//! - `Operator`: comparison symbol with its per-type legality table
//! - `RuleRecord`: one persisted `{signal_id, type, operator, test_data}` entry
//! - `TestData`: expected value as stored, number or text

mod operator;
mod record;

pub use operator::*;
pub use record::*;
