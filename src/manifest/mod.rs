//! Project metadata reading
//!
//! Builds the version table for the tracked dependencies from the
//! project's package.json.

mod package_json;

pub use package_json::{read_version_table, PackageJson, MANIFEST_FILENAME};
