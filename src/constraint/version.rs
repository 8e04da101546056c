//! Approximate version ordering.
//!
//! Versions are ordered by their numeric segments only: every maximal run of
//! ASCII digits becomes one component of the sort key, and keys compare
//! lexicographically. Separators, pre-release qualifiers and any other
//! non-numeric text are ignored, so `1.2.0-beta` and `1.2.0` compare equal.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

/// Regex for a maximal run of ASCII digits.
static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("DIGIT_RUN must compile"));

/// Extract the numeric sort key of a version string.
///
/// A string without any digits has the key `[0]`. Digit runs too large for
/// `u64` saturate.
///
/// ```
/// use modpin::constraint::version_key;
///
/// assert_eq!(version_key("1.20.1-forge-47.2.0"), vec![1, 20, 1, 47, 2, 0]);
/// assert_eq!(version_key("latest"), vec![0]);
/// ```
pub fn version_key(version: &str) -> Vec<u64> {
    let key: Vec<u64> = DIGIT_RUN
        .find_iter(version)
        .map(|m| m.as_str().parse().unwrap_or(u64::MAX))
        .collect();

    if key.is_empty() {
        vec![0]
    } else {
        key
    }
}

/// Compare two version strings by their numeric segments.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    version_key(a).cmp(&version_key(b))
}
