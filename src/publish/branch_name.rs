//! Working branch names.

use chrono::{DateTime, Utc};

/// Prefix used when the caller does not supply one.
pub const DEFAULT_BRANCH_PREFIX: &str = "auto-generated-tests";

/// Builds `<prefix>-<unix millis>` for the given instant.
///
/// A blank prefix falls back to [`DEFAULT_BRANCH_PREFIX`]. Trailing dashes on
/// the prefix are dropped so the separator is never doubled.
#[must_use]
pub fn branch_name_at(prefix: Option<&str>, at: DateTime<Utc>) -> String {
    let chosen = prefix
        .map(|value| value.trim().trim_end_matches('-'))
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_BRANCH_PREFIX);
    format!("{chosen}-{}", at.timestamp_millis())
}

/// Builds a branch name stamped with the current time.
#[must_use]
pub fn unique_branch_name(prefix: Option<&str>) -> String {
    branch_name_at(prefix, Utc::now())
}
