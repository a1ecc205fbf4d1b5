//! Merging overrides onto a base configuration
//!
//! The updater builds a profile's `user.js` by appending the override file to
//! the base file, and the browser applies statements in order, so for any key
//! set in both the override wins. [`append_overrides`] produces that text;
//! [`merge_preferences`] computes the resulting values and reports what the
//! overrides actually changed.

use crate::types::{MergedPreferences, PrefChange, PrefEntry};
use std::collections::HashMap;

/// Concatenate override text onto base text
///
/// A newline is inserted between the two when the base does not end with one,
/// so the first override statement never shares a line with base content.
///
/// # Example
///
/// ```rust
/// use ffov::append_overrides;
///
/// let merged = append_overrides("user_pref(\"a.b\", 1);", "user_pref(\"a.b\", 2);\n");
/// assert_eq!(merged, "user_pref(\"a.b\", 1);\nuser_pref(\"a.b\", 2);\n");
/// ```
pub fn append_overrides(base: &str, overrides: &str) -> String {
    let mut merged = String::with_capacity(base.len() + overrides.len() + 1);
    merged.push_str(base);
    if !base.is_empty() && !base.ends_with('\n') {
        merged.push('\n');
    }
    merged.push_str(overrides);
    merged
}

/// Apply `overrides` on top of `base` with last-wins precedence
///
/// Both slices are applied in order, so duplicates inside either one also
/// resolve to their last occurrence.
///
/// # Example
///
/// ```rust
/// use ffov::{merge_preferences, parse_prefs_js, PrefValue};
///
/// let base = parse_prefs_js(r#"
///     user_pref("browser.startup.page", 0);
///     user_pref("browser.formfill.enable", false);
/// "#)?;
/// let overrides = parse_prefs_js(r#"
///     user_pref("browser.startup.page", 3);
///     user_pref("browser.formfill.enable", false);
///     user_pref("sidebar.verticalTabs", true);
/// "#)?;
///
/// let merged = merge_preferences(&base, &overrides);
/// assert_eq!(merged.overridden[0].key, "browser.startup.page");
/// assert_eq!(merged.overridden[0].value, PrefValue::Integer(3));
/// assert_eq!(merged.added, vec!["sidebar.verticalTabs".to_string()]);
/// assert_eq!(merged.redundant, vec!["browser.formfill.enable".to_string()]);
/// # Ok::<(), ffov::Error>(())
/// ```
pub fn merge_preferences(base: &[PrefEntry], overrides: &[PrefEntry]) -> MergedPreferences {
    let base_values = last_wins(base);
    let override_values = last_wins(overrides);

    let mut pref_map: HashMap<&str, &PrefEntry> = base_values.clone();
    pref_map.extend(override_values.iter().map(|(k, v)| (*k, *v)));

    let mut overridden = Vec::new();
    let mut added = Vec::new();
    let mut redundant = Vec::new();

    for (key, entry) in &override_values {
        match base_values.get(key) {
            None => added.push(key.to_string()),
            Some(previous) if previous.value == entry.value => redundant.push(key.to_string()),
            Some(previous) => overridden.push(PrefChange {
                key: key.to_string(),
                previous: previous.value.clone(),
                value: entry.value.clone(),
            }),
        }
    }

    overridden.sort_by(|a, b| a.key.cmp(&b.key));
    added.sort();
    redundant.sort();

    let mut entries: Vec<PrefEntry> = pref_map.into_values().cloned().collect();
    entries.sort_by(|a, b| a.key.cmp(&b.key));

    tracing::info!(
        total = entries.len(),
        overridden = overridden.len(),
        added = added.len(),
        redundant = redundant.len(),
        "merged overrides onto base"
    );

    MergedPreferences {
        entries,
        overridden,
        added,
        redundant,
    }
}

/// Get the effective entry for a preference key
///
/// Returns the last entry declaring `key`, matching how the browser applies
/// a file from top to bottom.
///
/// # Example
///
/// ```rust
/// use ffov::{get_effective_pref, parse_prefs_js, PrefValue};
///
/// let prefs = parse_prefs_js(r#"
///     user_pref("browser.ml.enable", true);
///     user_pref("browser.ml.enable", false);
/// "#)?;
///
/// let entry = get_effective_pref(&prefs, "browser.ml.enable").unwrap();
/// assert_eq!(entry.value, PrefValue::Bool(false));
/// # Ok::<(), ffov::Error>(())
/// ```
pub fn get_effective_pref<'a>(prefs: &'a [PrefEntry], key: &str) -> Option<&'a PrefEntry> {
    prefs.iter().rev().find(|e| e.key == key)
}

fn last_wins(prefs: &[PrefEntry]) -> HashMap<&str, &PrefEntry> {
    prefs.iter().map(|e| (e.key.as_str(), e)).collect()
}
