//! Structural checks for override documents
//!
//! The browser silently ignores malformed or mistyped entries, so mistakes in
//! an override file only show up as settings that quietly do nothing. [`lint`]
//! finds them ahead of time:
//!
//! - keys must be non-empty dotted identifiers
//! - two active entries must not set the same key to different values
//! - values must match the kind recorded in [`crate::known_pref`]
//! - commented-out entries must still parse once uncommented
//!
//! ```rust
//! use ffov::{lint, OverrideDocument, Rule};
//!
//! let doc = OverrideDocument::parse(r#"user_pref("browser.startup.page", "3");"#)?;
//! let report = lint(&doc);
//! assert!(report.has_errors());
//! assert_eq!(report.issues[0].rule, Rule::TypeMismatch);
//! # Ok::<(), ffov::Error>(())
//! ```

use crate::document::OverrideDocument;
use crate::schema::known_pref;
use crate::types::{OverrideEntry, PrefType, PrefValue, PrefValueExt};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// How serious an issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(name)
    }
}

/// Which check produced an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    EmptyKey,
    MalformedKey,
    ConflictingDuplicate,
    TypeMismatch,
    MalformedDisabledEntry,
    RedundantDuplicate,
    IntegerOutOfRange,
    NonUserPref,
    EnableWouldConflict,
}

impl Rule {
    /// Stable rule name used in output
    pub fn name(self) -> &'static str {
        match self {
            Rule::EmptyKey => "empty-key",
            Rule::MalformedKey => "malformed-key",
            Rule::ConflictingDuplicate => "conflicting-duplicate",
            Rule::TypeMismatch => "type-mismatch",
            Rule::MalformedDisabledEntry => "malformed-disabled-entry",
            Rule::RedundantDuplicate => "redundant-duplicate",
            Rule::IntegerOutOfRange => "integer-out-of-range",
            Rule::NonUserPref => "non-user-pref",
            Rule::EnableWouldConflict => "enable-would-conflict",
        }
    }

    /// Severity for an issue found on an active entry
    pub fn severity(self) -> Severity {
        match self {
            Rule::EmptyKey
            | Rule::MalformedKey
            | Rule::ConflictingDuplicate
            | Rule::TypeMismatch
            | Rule::MalformedDisabledEntry => Severity::Error,
            Rule::RedundantDuplicate | Rule::IntegerOutOfRange | Rule::NonUserPref => {
                Severity::Warning
            }
            Rule::EnableWouldConflict => Severity::Note,
        }
    }
}

/// A single finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub rule: Rule,
    pub severity: Severity,
    pub line: usize,
    pub key: Option<String>,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {} [{}]: {}",
            self.line,
            self.severity,
            self.rule.name(),
            self.message
        )
    }
}

/// All findings for a document, sorted by line
#[derive(Debug, Clone, Default, Serialize)]
pub struct LintReport {
    pub issues: Vec<Issue>,
}

impl LintReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    /// Issues at or above `severity`
    pub fn at_least(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.severity >= severity)
    }
}

/// Run every check against `doc`
pub fn lint(doc: &OverrideDocument) -> LintReport {
    let mut issues = Vec::new();

    for entry in doc.entries() {
        check_key(entry, &mut issues);
        check_value(entry, &mut issues);
        if entry.enabled && entry.pref_type != PrefType::User {
            issues.push(issue(
                Rule::NonUserPref,
                entry,
                format!(
                    "override uses {}(); the updater expects user_pref()",
                    entry.pref_type.function_name()
                ),
            ));
        }
    }

    check_duplicates(doc, &mut issues);

    for malformed in doc.malformed() {
        issues.push(Issue {
            rule: Rule::MalformedDisabledEntry,
            severity: Rule::MalformedDisabledEntry.severity(),
            line: malformed.line,
            key: None,
            message: format!(
                "commented-out entry would not parse if enabled: {}",
                malformed.message
            ),
        });
    }

    issues.sort_by_key(|i| i.line);

    let report = LintReport { issues };
    tracing::debug!(
        errors = report.count(Severity::Error),
        warnings = report.count(Severity::Warning),
        notes = report.count(Severity::Note),
        "lint finished"
    );
    report
}

/// Whether `key` is a non-empty dotted identifier without blanks
pub fn is_valid_key(key: &str) -> bool {
    key.contains('.')
        && key.split('.').all(|segment| {
            !segment.is_empty() && !segment.chars().any(|c| c.is_whitespace() || c.is_control())
        })
}

fn issue(rule: Rule, entry: &OverrideEntry, message: String) -> Issue {
    // Problems on disabled entries only matter once they are enabled
    let severity = if entry.enabled || rule == Rule::EnableWouldConflict {
        rule.severity()
    } else {
        rule.severity().min(Severity::Warning)
    };
    Issue {
        rule,
        severity,
        line: entry.line,
        key: Some(entry.key.clone()),
        message,
    }
}

fn check_key(entry: &OverrideEntry, issues: &mut Vec<Issue>) {
    if entry.key.is_empty() {
        issues.push(issue(Rule::EmptyKey, entry, "preference key is empty".to_string()));
    } else if !is_valid_key(&entry.key) {
        issues.push(issue(
            Rule::MalformedKey,
            entry,
            format!("'{}' is not a dotted preference name", entry.key),
        ));
    }
}

fn check_value(entry: &OverrideEntry, issues: &mut Vec<Issue>) {
    if let Some(known) = known_pref(&entry.key) {
        let actual = entry.value.kind();
        if actual != known.kind {
            issues.push(issue(
                Rule::TypeMismatch,
                entry,
                format!(
                    "'{}' expects type {}, found {} {}",
                    entry.key, known.kind, actual, entry.value
                ),
            ));
        }
    }

    if let PrefValue::Integer(n) = entry.value {
        if i32::try_from(n).is_err() {
            issues.push(issue(
                Rule::IntegerOutOfRange,
                entry,
                format!("{} does not fit the browser's 32-bit integer preferences", n),
            ));
        }
    }
}

fn check_duplicates(doc: &OverrideDocument, issues: &mut Vec<Issue>) {
    // Each occurrence is compared with the value in force just before it
    let mut in_force: HashMap<&str, &OverrideEntry> = HashMap::new();

    for entry in doc.active() {
        let Some(previous) = in_force.insert(&entry.key, entry) else {
            continue;
        };
        if previous.value == entry.value {
            issues.push(issue(
                Rule::RedundantDuplicate,
                entry,
                format!(
                    "'{}' is already set to {} at line {}",
                    entry.key, entry.value, previous.line
                ),
            ));
        } else {
            issues.push(issue(
                Rule::ConflictingDuplicate,
                entry,
                format!(
                    "'{}' is set to {} here but {} at line {}; the last one wins",
                    entry.key, entry.value, previous.value, previous.line
                ),
            ));
        }
    }

    for entry in doc.disabled() {
        if let Some(active) = doc.effective_value(&entry.key) {
            if *active != entry.value {
                issues.push(issue(
                    Rule::EnableWouldConflict,
                    entry,
                    format!(
                        "enabling this would change '{}' from {} to {}",
                        entry.key, active, entry.value
                    ),
                ));
            }
        }
    }
}
