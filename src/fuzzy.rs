//! Textual closeness ranking
//!
//! Dependency discovery has no authoritative source of truth to query; the
//! only signal connecting a package name to its install is that the name
//! appears, approximately, in the install's own paths. This module ranks
//! candidate strings by closeness to a target so traversal code can try the
//! most plausible directories first. Closeness, not presence, is the
//! contract: every candidate is returned, ranked, with no cutoff.
//!
//! The ranking strategy is isolated here so it can be swapped or tuned
//! without touching any traversal logic.

use std::cmp::Ordering;
use strsim::normalized_damerau_levenshtein;

/// Rank `items` by closeness of `key(item)` to `target`, closest first.
///
/// All items are returned regardless of how poorly they match. The sort is
/// stable, so equally-close items keep their input order and identical
/// inputs always produce identical rankings. Callers are expected to
/// lowercase both sides beforehand; this function compares strings as given.
#[must_use]
pub fn rank_by<'a, T, F>(target: &str, items: &'a [T], key: F) -> Vec<&'a T>
where
    F: Fn(&T) -> &str,
{
    let mut scored: Vec<(&'a T, f64)> = items
        .iter()
        .map(|item| (item, normalized_damerau_levenshtein(target, key(item))))
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.into_iter().map(|(item, _score)| item).collect()
}

/// The single closest item, when any exist.
#[must_use]
pub fn closest<'a, T, F>(target: &str, items: &'a [T], key: F) -> Option<&'a T>
where
    F: Fn(&T) -> &str,
{
    rank_by(target, items, key).into_iter().next()
}
