//! Tracked dependency records

use std::fmt;

/// A tracked dependency and its current major version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRecord {
    /// Package name, e.g. `@angular/core`
    pub identifier: String,
    /// Current major version
    pub current_version: u64,
}

impl DependencyRecord {
    /// Creates a new dependency record
    pub fn new(identifier: impl Into<String>, current_version: u64) -> Self {
        Self {
            identifier: identifier.into(),
            current_version,
        }
    }

    /// Returns true if this dependency has reached (or passed) the target
    pub fn is_converged(&self, target: u64) -> bool {
        self.current_version >= target
    }
}

impl fmt::Display for DependencyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.identifier, self.current_version)
    }
}
