//! In-memory rule store keyed by signal id.
//!
//! Rules are kept per signal in insertion order, signals themselves in first
//! insertion order, so `serialize` is reproducible for identical input.
//! Mutations take the write lock; the stream validator holds the read lock
//! for a whole traversal.

mod core;


pub use self::core::{RuleMap, RuleStore};
