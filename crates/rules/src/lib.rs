//! Signal reading validation against a persisted rule set.
//!
//! This crate provides:
//! - Operator model with the per-type legal operator table
//! - Type-polymorphic validators for String, Integer and Datetime readings
//! - An insertion-ordered, lock-protected rule store with bulk load/serialize
//! - JSON/YAML snapshot persistence with hot-reload via `notify` watcher
//! - A stream validator with fail-fast and collect-and-continue modes

pub mod error;
pub mod rule;
pub mod schema;
pub mod snapshot;
pub mod store;
pub mod stream;
pub mod validators;

pub use error::{Result, RuleError};
pub use rule::{Expected, Rule};
pub use schema::{Operator, RuleRecord, TestData};
pub use sigrule_core::{Reading, ValueType};
pub use snapshot::SnapshotWatcher;
pub use store::RuleStore;
pub use stream::{Failure, FailureMode, StreamValidator, ValidationReport};
