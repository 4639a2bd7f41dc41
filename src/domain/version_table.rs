//! Insertion-ordered table of tracked dependency versions
//!
//! The table is built once per run from package.json and mutated in place by
//! the upgrade loop. The only mutation is bumping one entry by one major
//! version; entries are never removed. Iteration order is insertion order,
//! which fixes the order of upgrade commits.

use super::DependencyRecord;
use indexmap::IndexMap;

/// Mapping from dependency identifier to its current major version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionTable {
    entries: IndexMap<String, u64>,
}

impl VersionTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from records, keeping their order
    pub fn from_records(records: impl IntoIterator<Item = DependencyRecord>) -> Self {
        let mut table = Self::new();
        for record in records {
            table.insert(record.identifier, record.current_version);
        }
        table
    }

    /// Adds a dependency. A duplicate identifier keeps its original position.
    pub fn insert(&mut self, identifier: impl Into<String>, version: u64) {
        self.entries.insert(identifier.into(), version);
    }

    /// Current version of a dependency
    pub fn get(&self, identifier: &str) -> Option<u64> {
        self.entries.get(identifier).copied()
    }

    /// Overwrite the version of a known dependency, returning the previous one.
    ///
    /// Unknown identifiers are ignored and yield `None`.
    pub fn set(&mut self, identifier: &str, version: u64) -> Option<u64> {
        self.entries
            .get_mut(identifier)
            .map(|current| std::mem::replace(current, version))
    }

    /// Number of tracked dependencies
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifiers in insertion order
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Records in insertion order
    pub fn records(&self) -> impl Iterator<Item = DependencyRecord> + '_ {
        self.entries
            .iter()
            .map(|(identifier, version)| DependencyRecord::new(identifier.clone(), *version))
    }

    /// Number of dependencies at or above `target`
    pub fn converged_count(&self, target: u64) -> usize {
        self.entries.values().filter(|v| **v >= target).count()
    }

    /// Returns true once every dependency has reached `target`
    pub fn is_converged(&self, target: u64) -> bool {
        self.converged_count(target) == self.len()
    }

    /// Identifiers still below `target`, in insertion order
    pub fn pending(&self, target: u64) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, v)| **v < target)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Largest number of major steps any dependency still needs
    pub fn largest_gap(&self, target: u64) -> u64 {
        self.entries
            .values()
            .map(|v| target.saturating_sub(*v))
            .max()
            .unwrap_or(0)
    }
}
