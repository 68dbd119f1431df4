//! Input normalization for place names.
//!
//! Names are compared by a case-insensitive, whitespace-collapsed identity,
//! so "Nashville", " nashville " and "NASHVILLE" are the same place. The
//! first-seen spelling is kept as the display and lookup form.

use std::collections::HashSet;

use crate::error::{Error, Result};

/// Collapses internal whitespace runs to single spaces and trims the ends.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// De-duplication identity of a name: normalized form, lower-cased.
pub fn identity(raw: &str) -> String {
    normalize_name(raw).to_lowercase()
}

/// Validates the home name and builds the working node set: home first, then
/// each distinct stop in first-seen order.
///
/// Blank stops are dropped, duplicates keep their first spelling, and stops
/// naming home itself are removed since home is already the anchor.
pub fn normalize_input(home: &str, stops: &[String]) -> Result<Vec<String>> {
    let home = normalize_name(home);
    if home.is_empty() {
        return Err(Error::invalid_input("home must not be empty"));
    }

    let mut seen = HashSet::new();
    seen.insert(home.to_lowercase());

    let mut nodes = vec![home];
    for stop in stops {
        let stop = normalize_name(stop);
        if stop.is_empty() {
            continue;
        }
        if seen.insert(stop.to_lowercase()) {
            nodes.push(stop);
        }
    }

    Ok(nodes)
}
