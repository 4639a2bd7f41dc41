//! Core domain models for majorstep
//!
//! This module contains the fundamental types used throughout the application:
//! - Dependency records and their current major version
//! - The insertion-ordered version table driven by the upgrade loop
//! - Major version extraction from manifest version strings

mod dependency;
mod major_version;
mod version_table;

pub use dependency::DependencyRecord;
pub use major_version::parse_major;
pub use version_table::VersionTable;
