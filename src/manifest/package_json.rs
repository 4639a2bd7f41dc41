//! package.json reader for tracked dependencies
//!
//! Each tracked identifier is looked up in `dependencies` first, then in
//! `devDependencies`. Every tracked identifier must be present with a
//! version string that has a numeric major component.

use crate::domain::{parse_major, DependencyRecord, VersionTable};
use crate::error::{AppError, MetadataError};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Manifest filename inside the project directory
pub const MANIFEST_FILENAME: &str = "package.json";

/// The dependency sections of a package.json
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    /// Runtime dependencies
    #[serde(default)]
    pub dependencies: Map<String, Value>,
    /// Development dependencies
    #[serde(default)]
    pub dev_dependencies: Map<String, Value>,
}

impl PackageJson {
    /// Parse package.json content; `path` is only used in errors
    pub fn parse(content: &str, path: &Path) -> Result<Self, MetadataError> {
        serde_json::from_str(content)
            .map_err(|e| MetadataError::json_parse_error(path, e.to_string()))
    }

    /// Raw version string of a dependency, runtime section first
    pub fn raw_version(&self, identifier: &str, path: &Path) -> Result<&str, MetadataError> {
        let value = self
            .dependencies
            .get(identifier)
            .or_else(|| self.dev_dependencies.get(identifier))
            .ok_or_else(|| MetadataError::missing_dependency(path, identifier))?;

        value.as_str().ok_or_else(|| MetadataError::NotAString {
            path: path.to_path_buf(),
            identifier: identifier.to_string(),
        })
    }

    /// Build the version table for `identifiers`, keeping their order
    pub fn version_table(&self, identifiers: &[String], path: &Path) -> Result<VersionTable, AppError> {
        let mut records = Vec::with_capacity(identifiers.len());
        for identifier in identifiers {
            let raw = self.raw_version(identifier, path)?;
            let major = parse_major(identifier, raw)?;
            records.push(DependencyRecord::new(identifier.clone(), major));
        }
        Ok(VersionTable::from_records(records))
    }
}

/// Read the tracked dependencies' major versions from `<project_dir>/package.json`
pub fn read_version_table(
    project_dir: &Path,
    identifiers: &[String],
) -> Result<VersionTable, AppError> {
    let path: PathBuf = project_dir.join(MANIFEST_FILENAME);
    let content =
        std::fs::read_to_string(&path).map_err(|e| MetadataError::read_error(&path, e))?;
    let manifest = PackageJson::parse(&content, &path)?;
    manifest.version_table(identifiers, &path)
}
