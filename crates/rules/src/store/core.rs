//! Core [`RuleStore`] handle.

use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use sigrule_core::ValueType;
use tracing::{info, warn};

use crate::error::Result;
use crate::rule::Rule;
use crate::schema::{Operator, RuleRecord};
use crate::snapshot::{read_rules_file, write_rules_file};

/// Signal id → rules in insertion order.
pub type RuleMap = IndexMap<String, Vec<Rule>>;

/// Shared, lock-protected rule store.
///
/// Cloning the handle shares the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    rules: Arc<RwLock<RuleMap>>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a rule and append it to `signal_id`'s list.
    ///
    /// A conversion failure leaves the store untouched. Operator/type
    /// legality is not enforced, only logged.
    pub fn add(
        &self,
        signal_id: &str,
        value_type: ValueType,
        operator: Operator,
        raw_expected: &str,
    ) -> Result<()> {
        let rule = Rule::new(value_type, operator, raw_expected)?;
        insert_rule(&mut self.write(), signal_id, rule);
        Ok(())
    }

    /// [`RuleStore::add`] for a snapshot record.
    pub fn add_record(&self, record: &RuleRecord) -> Result<()> {
        let rule = Rule::from_record(record)?;
        insert_rule(&mut self.write(), &record.signal_id, rule);
        Ok(())
    }

    /// Remove every rule of every signal.
    pub fn clear(&self) {
        let mut rules = self.write();
        let dropped: usize = rules.values().map(Vec::len).sum();
        rules.clear();
        info!(rules = dropped, "cleared rule store");
    }

    /// Flatten into records: signals in insertion order, then each signal's
    /// rules in insertion order.
    pub fn serialize(&self) -> Vec<RuleRecord> {
        self.read()
            .iter()
            .flat_map(|(signal_id, rules)| rules.iter().map(move |rule| rule.to_record(signal_id)))
            .collect()
    }

    /// Add every record in order under one write lock.
    ///
    /// Not transactional: if a record fails to convert the call returns the
    /// error, and rules added from earlier records in this call stay.
    pub fn load<'a, I>(&self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a RuleRecord>,
    {
        let mut rules = self.write();
        let mut added = 0;
        for record in records {
            let rule = Rule::from_record(record).inspect_err(|e| {
                warn!(
                    signal = %record.signal_id,
                    index = added,
                    error = %e,
                    "aborting rule load on malformed record"
                );
            })?;
            insert_rule(&mut rules, &record.signal_id, rule);
            added += 1;
        }
        info!(rules = added, "loaded rules");
        Ok(added)
    }

    /// Replace the whole store with `records`, all or nothing.
    ///
    /// Every record is converted before the lock is taken; on failure the
    /// previous rules are kept.
    pub fn reload(&self, records: &[RuleRecord]) -> Result<usize> {
        let mut fresh = RuleMap::new();
        for record in records {
            insert_rule(&mut fresh, &record.signal_id, Rule::from_record(record)?);
        }
        *self.write() = fresh;
        info!(rules = records.len(), "reloaded rule store");
        Ok(records.len())
    }

    /// Read a snapshot file and [`load`](RuleStore::load) its records.
    pub fn load_file(&self, path: &Path) -> Result<usize> {
        let records = read_rules_file(path)?;
        self.load(&records)
    }

    /// [`serialize`](RuleStore::serialize) into a snapshot file.
    pub fn save_file(&self, path: &Path) -> Result<()> {
        write_rules_file(path, &self.serialize())
    }

    /// Copy of the rules registered for `signal_id`.
    pub fn rules_for(&self, signal_id: &str) -> Option<Vec<Rule>> {
        self.read().get(signal_id).cloned()
    }

    /// Signal ids in insertion order.
    pub fn signals(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Total number of rules across all signals.
    pub fn len(&self) -> usize {
        self.read().values().map(Vec::len).sum()
    }

    pub fn signal_count(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Shared read access for a full validation traversal.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, RuleMap> {
        self.rules.read().expect("rules lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, RuleMap> {
        self.rules.write().expect("rules lock poisoned")
    }
}

fn insert_rule(rules: &mut RuleMap, signal_id: &str, rule: Rule) {
    if !rule.operator().is_legal_for(rule.value_type()) {
        warn!(
            signal = %signal_id,
            value_type = %rule.value_type(),
            operator = %rule.operator(),
            "operator is not legal for value type, keeping rule as-is"
        );
    }
    rules.entry(signal_id.to_string()).or_default().push(rule);
}
