//! Major version extraction from manifest version strings
//!
//! Handles version formats:
//! - Caret / tilde ranges: `^14.2.0`, `~13.1`
//! - Comparisons: `>=12.0.0`, `=12.1.0`, `<=11`
//! - Bare and prefixed versions: `12`, `12.1.0`, `v12.1.0`
//! - Wildcards after the major: `12.x`, `12.*`
//!
//! Anything without a numeric major (`latest`, `*`, git URLs, tags) is rejected.

use crate::error::VersionParseError;
use regex::Regex;
use std::sync::LazyLock;

static MAJOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\^|~|>=|<=|>|<|=|v)?\s*v?(\d+)(?:\.(?:\d+|[x*]))*(?:-[\w.]+)?(?:\+[\w.]+)?$")
        .unwrap()
});

/// Reduce a manifest version string to its leading major version.
///
/// `identifier` is only used for the error message.
pub fn parse_major(identifier: &str, raw: &str) -> Result<u64, VersionParseError> {
    let trimmed = raw.trim();

    MAJOR_RE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .and_then(|major| major.as_str().parse::<u64>().ok())
        .ok_or_else(|| VersionParseError::new(identifier, raw))
}
