use crate::error::{Error, Result};
use crate::types::{OverrideEntry, PrefEntry};
use glob::Pattern;

/// Anything that carries a preference key
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for PrefEntry {
    fn key(&self) -> &str {
        &self.key
    }
}

impl Keyed for OverrideEntry {
    fn key(&self) -> &str {
        &self.key
    }
}

/// Query entries by glob patterns (OR logic)
/// Returns entries matching any of the provided patterns, in input order
pub fn query_entries<'a, T: Keyed>(entries: &'a [T], patterns: &[&str]) -> Result<Vec<&'a T>> {
    // Compile all patterns first to fail fast on invalid patterns
    let compiled_patterns: Vec<Pattern> = patterns
        .iter()
        .map(|p| {
            Pattern::new(p)
                .map_err(|e| Error::InvalidGlobPattern(format!("'{}': {}", p, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(entries
        .iter()
        .filter(|entry| {
            compiled_patterns
                .iter()
                .any(|pattern| pattern.matches(entry.key()))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PrefType, PrefValue};

    fn create_test_entries() -> Vec<PrefEntry> {
        [
            ("network.http.max-connections", PrefValue::Integer(1800)),
            ("network.dnsCacheExpiration", PrefValue::Integer(3600)),
            ("browser.startup.page", PrefValue::Integer(3)),
            ("browser.download.useDownloadDir", PrefValue::Bool(true)),
            ("devtools.theme", PrefValue::String("dark".to_string())),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (key, value))| PrefEntry {
            key: key.to_string(),
            value,
            pref_type: PrefType::User,
            line: i + 1,
        })
        .collect()
    }

    #[test]
    fn test_query_single_pattern() {
        let entries = create_test_entries();
        let queried = query_entries(&entries, &["network.*"]).unwrap();
        assert_eq!(queried.len(), 2);
        assert_eq!(queried[0].key, "network.http.max-connections");
    }

    #[test]
    fn test_query_multiple_patterns_or_logic() {
        let entries = create_test_entries();
        let queried = query_entries(&entries, &["network.*", "devtools.theme"]).unwrap();
        assert_eq!(queried.len(), 3);
    }

    #[test]
    fn test_query_wildcard_in_middle() {
        let entries = create_test_entries();
        let queried = query_entries(&entries, &["browser.*.page"]).unwrap();
        assert_eq!(queried.len(), 1);
        assert_eq!(queried[0].key, "browser.startup.page");
    }

    #[test]
    fn test_query_no_matches() {
        let entries = create_test_entries();
        assert!(query_entries(&entries, &["nonexistent.*"]).unwrap().is_empty());
    }

    #[test]
    fn test_query_invalid_pattern() {
        let entries = create_test_entries();
        assert!(matches!(
            query_entries(&entries, &["[invalid"]),
            Err(Error::InvalidGlobPattern(_))
        ));
    }
}
