//! Core data types for preference files and override documents

use serde::Serialize;
use std::fmt;

/// Which pref function declared an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefType {
    /// `user_pref(...)`
    User,
    /// `pref(...)`
    Default,
    /// `lock_pref(...)`
    Locked,
    /// `sticky_pref(...)`
    Sticky,
}

impl PrefType {
    /// Map a pref function name to its type
    pub fn from_function(name: &str) -> Option<Self> {
        match name {
            "user_pref" => Some(PrefType::User),
            "pref" => Some(PrefType::Default),
            "lock_pref" => Some(PrefType::Locked),
            "sticky_pref" => Some(PrefType::Sticky),
            _ => None,
        }
    }

    /// The pref function name that declares this type
    pub fn function_name(self) -> &'static str {
        match self {
            PrefType::User => "user_pref",
            PrefType::Default => "pref",
            PrefType::Locked => "lock_pref",
            PrefType::Sticky => "sticky_pref",
        }
    }
}

/// A preference value
///
/// The preference runtime only knows booleans, integers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Integer(i64),
    String(String),
}

/// The kind of a [`PrefValue`], without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Bool,
    Integer,
    String,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Bool => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::String => "string",
        };
        f.write_str(name)
    }
}

/// Convenience accessors for [`PrefValue`]
pub trait PrefValueExt {
    fn as_bool(&self) -> Option<bool>;
    fn as_i64(&self) -> Option<i64>;
    fn as_str(&self) -> Option<&str>;
    fn kind(&self) -> ValueKind;
}

impl PrefValueExt for PrefValue {
    fn as_bool(&self) -> Option<bool> {
        match self {
            PrefValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            PrefValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            PrefValue::String(s) => Some(s),
            _ => None,
        }
    }

    fn kind(&self) -> ValueKind {
        match self {
            PrefValue::Bool(_) => ValueKind::Bool,
            PrefValue::Integer(_) => ValueKind::Integer,
            PrefValue::String(_) => ValueKind::String,
        }
    }
}

/// Renders the value as a prefs.js literal
impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefValue::Bool(b) => write!(f, "{}", b),
            PrefValue::Integer(n) => write!(f, "{}", n),
            PrefValue::String(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        '\t' => f.write_str("\\t")?,
                        c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
                        c => write!(f, "{}", c)?,
                    }
                }
                f.write_str("\"")
            }
        }
    }
}

/// A preference declared in a plain prefs.js or user.js file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefEntry {
    pub key: String,
    pub value: PrefValue,
    pub pref_type: PrefType,
    /// 1-indexed line of the pref function name
    pub line: usize,
}

impl PrefEntry {
    /// Render the entry as a single prefs.js statement
    pub fn to_statement(&self) -> String {
        format!(
            "{}({}, {});",
            self.pref_type.function_name(),
            PrefValue::String(self.key.clone()),
            self.value
        )
    }
}

/// A preference override declared in an override document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverrideEntry {
    pub key: String,
    pub value: PrefValue,
    pub pref_type: PrefType,
    /// `false` when the entry is commented out with `//`
    pub enabled: bool,
    /// Trailing `//` comment on the entry's line
    pub annotation: Option<String>,
    /// Title of the enclosing section header, if any
    pub section: Option<String>,
    /// 1-indexed line where the statement starts
    pub line: usize,
    /// 1-indexed line where the statement ends
    #[serde(skip)]
    pub end_line: usize,
}

impl OverrideEntry {
    /// View this override as a plain preference entry
    pub fn to_pref_entry(&self) -> PrefEntry {
        PrefEntry {
            key: self.key.clone(),
            value: self.value.clone(),
            pref_type: self.pref_type,
            line: self.line,
        }
    }
}

/// Result of merging a base configuration with overrides
#[derive(Debug, Clone, Serialize)]
pub struct MergedPreferences {
    /// Effective entries, sorted by key
    pub entries: Vec<PrefEntry>,
    /// Keys whose base value was replaced
    pub overridden: Vec<PrefChange>,
    /// Keys absent from the base
    pub added: Vec<String>,
    /// Keys the overrides set to the value the base already had
    pub redundant: Vec<String>,
}

/// A base value replaced by an override
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefChange {
    pub key: String,
    pub previous: PrefValue,
    pub value: PrefValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_string_escapes() {
        let value = PrefValue::String("{\"a\":\"b\\c\"}\n".to_string());
        assert_eq!(value.to_string(), r#""{\"a\":\"b\\c\"}\n""#);
    }

    #[test]
    fn test_display_scalars() {
        assert_eq!(PrefValue::Bool(false).to_string(), "false");
        assert_eq!(PrefValue::Integer(-3).to_string(), "-3");
    }

    #[test]
    fn test_pref_type_roundtrip_names() {
        for t in [
            PrefType::User,
            PrefType::Default,
            PrefType::Locked,
            PrefType::Sticky,
        ] {
            assert_eq!(PrefType::from_function(t.function_name()), Some(t));
        }
        assert_eq!(PrefType::from_function("set_pref"), None);
    }

    #[test]
    fn test_to_statement() {
        let entry = PrefEntry {
            key: "browser.startup.page".to_string(),
            value: PrefValue::Integer(3),
            pref_type: PrefType::User,
            line: 1,
        };
        assert_eq!(entry.to_statement(), r#"user_pref("browser.startup.page", 3);"#);
    }

    #[test]
    fn test_value_ext() {
        assert_eq!(PrefValue::Bool(true).as_bool(), Some(true));
        assert_eq!(PrefValue::Integer(7).as_i64(), Some(7));
        assert_eq!(PrefValue::String("x".into()).as_str(), Some("x"));
        assert_eq!(PrefValue::Integer(7).as_str(), None);
        assert_eq!(PrefValue::String("3".into()).kind(), ValueKind::String);
    }

    #[test]
    fn test_serialize_value_untagged() {
        let json = serde_json::to_string(&PrefValue::Integer(3)).unwrap();
        assert_eq!(json, "3");
    }
}
