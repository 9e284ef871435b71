//! Retention ledger for guarded keys
//!
//! A load records which guarded keys were absent from the document; the
//! following save removes those keys again unless their guard has become
//! true. This keeps a hidden key hidden across load/save cycles while the
//! guard stays off.

use std::collections::{BTreeMap, BTreeSet};

/// Pairs of `(guard path, dependent path)`, both absolute document paths
///
/// One guard may hide any number of dependents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionLedger {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl RetentionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `dependent` is kept only while `guard` is true.
    ///
    /// Returns `false` if the pair was already recorded.
    pub fn record(&mut self, guard: impl Into<String>, dependent: impl Into<String>) -> bool {
        self.entries
            .entry(guard.into())
            .or_default()
            .insert(dependent.into())
    }

    pub fn contains(&self, guard: &str, dependent: &str) -> bool {
        self.entries
            .get(guard)
            .is_some_and(|deps| deps.contains(dependent))
    }

    /// Dependents recorded for `guard`
    pub fn dependents(&self, guard: &str) -> impl Iterator<Item = &str> {
        self.entries
            .get(guard)
            .into_iter()
            .flat_map(|deps| deps.iter().map(String::as_str))
    }

    /// Every `(guard, dependent)` pair, ordered by guard then dependent
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(guard, deps)| {
            deps.iter()
                .map(move |dep| (guard.as_str(), dep.as_str()))
        })
    }

    /// Number of recorded pairs
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_one_guard_many_dependents() {
        let mut ledger = RetentionLedger::new();
        assert!(ledger.record("proxy.enabled", "proxy.port"));
        assert!(ledger.record("proxy.enabled", "proxy.host"));
        assert!(!ledger.record("proxy.enabled", "proxy.port"));

        assert_eq!(ledger.len(), 2);
        assert!(ledger.contains("proxy.enabled", "proxy.host"));
        assert!(!ledger.contains("proxy.host", "proxy.enabled"));
        assert_eq!(
            ledger.dependents("proxy.enabled").collect::<Vec<_>>(),
            vec!["proxy.host", "proxy.port"]
        );
    }

    #[test]
    fn test_entries_are_ordered() {
        let mut ledger = RetentionLedger::new();
        ledger.record("b", "x");
        ledger.record("a", "y");

        assert_eq!(
            ledger.entries().collect::<Vec<_>>(),
            vec![("a", "y"), ("b", "x")]
        );
    }

    #[test]
    fn test_clear() {
        let mut ledger = RetentionLedger::new();
        ledger.record("a", "b");
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.dependents("a").count(), 0);
    }
}
