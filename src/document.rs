//! Override documents
//!
//! An [`OverrideDocument`] is a parsed `user-overrides.js`: every source line
//! is kept verbatim, and each `user_pref(...)` statement becomes an
//! [`OverrideEntry`]. A `//` line whose body is itself a complete statement is
//! a *disabled* entry, which [`OverrideDocument::enable`] can switch back on.
//!
//! ```rust
//! use ffov::OverrideDocument;
//!
//! let mut doc = OverrideDocument::parse(
//!     "/*** MEDIA ***/\n// user_pref(\"media.eme.enabled\", true); // DRM\n",
//! )?;
//! assert_eq!(doc.active().count(), 0);
//!
//! doc.enable("media.eme.enabled")?;
//! assert_eq!(doc.render(), "/*** MEDIA ***/\nuser_pref(\"media.eme.enabled\", true); // DRM\n");
//! # Ok::<(), ffov::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::install::write_atomically;
use crate::lexer::{Lexer, Token};
use crate::parser::{Parser, Statement};
use crate::types::{OverrideEntry, PrefEntry, PrefType, PrefValue};
use serde::Serialize;
use std::path::Path;

/// A parsed override file that can be edited and rendered back
#[derive(Debug, Clone)]
pub struct OverrideDocument {
    lines: Vec<String>,
    entries: Vec<OverrideEntry>,
    sections: Vec<Section>,
    malformed: Vec<MalformedEntry>,
}

/// A `/*** TITLE ***/` (level 1) or `/** TITLE **/` (level 2) header
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub level: u8,
    pub line: usize,
}

/// A `//` line that looks like a pref call but would not parse if uncommented
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MalformedEntry {
    pub line: usize,
    pub text: String,
    pub message: String,
}

/// What a single `//` comment turned out to be
enum CommentKind {
    Plain,
    Disabled(Statement, Option<String>),
    Malformed(String),
}

impl OverrideDocument {
    /// Parse override text
    ///
    /// A malformed active statement is an error; malformed disabled entries
    /// are collected and reported by [`crate::lint`].
    pub fn parse(content: &str) -> Result<Self> {
        let mut parser = Parser::new(Lexer::with_comments(content))?;
        let mut entries = Vec::new();
        let mut sections = Vec::new();
        let mut malformed = Vec::new();
        let mut section: Option<String> = None;
        let source_lines: Vec<&str> = content.split('\n').collect();

        loop {
            let current = parser.current().clone();
            match current.token {
                Token::Eof => break,
                Token::BlockComment(text) => {
                    if let Some((title, level)) = section_title(&text) {
                        section = Some(title.clone());
                        sections.push(Section {
                            title,
                            level,
                            line: current.line,
                        });
                    }
                    parser.advance()?;
                }
                Token::LineComment(text) => {
                    parser.advance()?;
                    // Only a comment that opens its line can be toggled
                    if !starts_line(&source_lines, current.line, current.column) {
                        continue;
                    }
                    // Body starts after the two slashes
                    match classify_comment(&text, current.line, current.column + 2) {
                        CommentKind::Plain => {}
                        CommentKind::Disabled(statement, annotation) => {
                            entries.push(make_entry(statement, false, annotation, &section));
                        }
                        CommentKind::Malformed(message) => malformed.push(MalformedEntry {
                            line: current.line,
                            text: text.trim().to_string(),
                            message,
                        }),
                    }
                }
                _ => {
                    let statement = parser.parse_statement()?;
                    let mut annotation = None;
                    let next = parser.current();
                    if let Token::LineComment(text) = &next.token {
                        if next.line == statement.end_line {
                            annotation = clean_annotation(text);
                            parser.advance()?;
                        }
                    }
                    entries.push(make_entry(statement, true, annotation, &section));
                }
            }
        }

        let doc = OverrideDocument {
            lines: source_lines.iter().map(|l| l.to_string()).collect(),
            entries,
            sections,
            malformed,
        };
        tracing::debug!(
            active = doc.active().count(),
            disabled = doc.disabled().count(),
            malformed = doc.malformed.len(),
            "parsed override document"
        );
        Ok(doc)
    }

    /// Read and parse an override file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// All entries, active and disabled, in file order
    pub fn entries(&self) -> &[OverrideEntry] {
        &self.entries
    }

    /// Entries that are applied
    pub fn active(&self) -> impl Iterator<Item = &OverrideEntry> {
        self.entries.iter().filter(|e| e.enabled)
    }

    /// Entries that are commented out
    pub fn disabled(&self) -> impl Iterator<Item = &OverrideEntry> {
        self.entries.iter().filter(|e| !e.enabled)
    }

    /// Every entry, active or disabled, declaring `key`
    pub fn find<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a OverrideEntry> + 'a {
        self.entries.iter().filter(move |e| e.key == key)
    }

    /// The value the runtime would apply for `key` (last active occurrence)
    pub fn effective_value(&self, key: &str) -> Option<&PrefValue> {
        self.active().filter(|e| e.key == key).last().map(|e| &e.value)
    }

    /// Active entries as plain preferences, in file order
    pub fn active_prefs(&self) -> Vec<PrefEntry> {
        self.active().map(OverrideEntry::to_pref_entry).collect()
    }

    /// Section headers in file order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Commented pref calls that would not parse if uncommented
    pub fn malformed(&self) -> &[MalformedEntry] {
        &self.malformed
    }

    /// The document text, byte-for-byte as parsed or edited
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    /// Uncomment the last disabled entry for `key`
    ///
    /// Returns the number of lines changed: 0 when the key is already active
    /// with the disabled value, or has no disabled entry.
    pub fn enable(&mut self, key: &str) -> Result<usize> {
        self.ensure_known(key)?;

        let Some(target) = self.disabled().filter(|e| e.key == key).last() else {
            return Ok(0);
        };

        if let Some(active) = self.active().filter(|e| e.key == key).last() {
            if active.value == target.value {
                return Ok(0);
            }
            return Err(Error::ConflictingOverride {
                key: key.to_string(),
                line: active.line,
                existing: active.value.to_string(),
            });
        }

        let line = target.line;
        self.toggle_lines(key, &[line], true, uncomment_line)?;
        tracing::info!(key, line, "enabled override");
        Ok(1)
    }

    /// Comment out every active entry for `key`
    ///
    /// Returns the number of lines changed: 0 when nothing was active.
    pub fn disable(&mut self, key: &str) -> Result<usize> {
        self.ensure_known(key)?;

        let mut lines = Vec::new();
        for entry in self.active().filter(|e| e.key == key) {
            if entry.end_line != entry.line {
                return Err(Error::MultilineEntry {
                    key: key.to_string(),
                    line: entry.line,
                });
            }
            lines.push(entry.line);
        }

        if lines.is_empty() {
            return Ok(0);
        }
        self.toggle_lines(key, &lines, false, comment_line)?;
        tracing::info!(key, count = lines.len(), "disabled override");
        Ok(lines.len())
    }

    /// Set the state of `key` to `enabled`
    pub fn set_enabled(&mut self, key: &str, enabled: bool) -> Result<usize> {
        if enabled {
            self.enable(key)
        } else {
            self.disable(key)
        }
    }

    fn ensure_known(&self, key: &str) -> Result<()> {
        if self.find(key).next().is_none() {
            return Err(Error::PreferenceNotFound {
                key: key.to_string(),
            });
        }
        Ok(())
    }

    /// Save the document to `path` through a temp file in the same directory
    pub fn write_to(&self, path: &Path) -> Result<()> {
        write_atomically(path, &self.render())?;
        tracing::debug!(path = %path.display(), "wrote override document");
        Ok(())
    }

    /// Rewrite 1-indexed `lines` and re-parse, leaving `self` untouched on error
    ///
    /// The edit must move exactly the `key` entry on each line into the
    /// `enabled` state; anything else it would change is refused.
    fn toggle_lines(
        &mut self,
        key: &str,
        lines: &[usize],
        enabled: bool,
        edit: fn(&str) -> String,
    ) -> Result<()> {
        let mut text = self.lines.clone();
        for &line in lines {
            let slot = text.get_mut(line - 1).ok_or_else(|| {
                Error::InvalidPreference(format!("line {} is out of range", line))
            })?;
            *slot = edit(slot);
        }

        let shared = |line: usize| Error::SharedLine {
            key: key.to_string(),
            line,
        };
        let first = lines.first().copied().unwrap_or_default();

        let edited = Self::parse(&text.join("\n")).map_err(|_| shared(first))?;
        if let Some(&line) = lines
            .iter()
            .find(|&&line| !toggled_alone(self, &edited, key, line, enabled))
        {
            return Err(shared(line));
        }
        if entries_off_lines(self, lines) != entries_off_lines(&edited, lines)
            || self.sections != edited.sections
            || self.malformed.len() != edited.malformed.len()
        {
            return Err(shared(first));
        }

        *self = edited;
        Ok(())
    }
}

/// Whether `line` holds only the `key` entry, before and after the edit
fn toggled_alone(
    before: &OverrideDocument,
    after: &OverrideDocument,
    key: &str,
    line: usize,
    enabled: bool,
) -> bool {
    match (
        entries_on_line(before, line).as_slice(),
        entries_on_line(after, line).as_slice(),
    ) {
        ([old], [new]) => {
            old.key == key
                && new.key == key
                && new.enabled == enabled
                && new.value == old.value
                && new.pref_type == old.pref_type
        }
        _ => false,
    }
}

fn entries_on_line(doc: &OverrideDocument, line: usize) -> Vec<&OverrideEntry> {
    doc.entries.iter().filter(|e| e.line == line).collect()
}

fn entries_off_lines<'a>(doc: &'a OverrideDocument, lines: &[usize]) -> Vec<&'a OverrideEntry> {
    doc.entries
        .iter()
        .filter(|e| !lines.contains(&e.line))
        .collect()
}

fn make_entry(
    statement: Statement,
    enabled: bool,
    annotation: Option<String>,
    section: &Option<String>,
) -> OverrideEntry {
    OverrideEntry {
        key: statement.key,
        value: statement.value,
        pref_type: statement.pref_type,
        enabled,
        annotation,
        section: section.clone(),
        line: statement.line,
        end_line: statement.end_line,
    }
}

/// Title and level of a single-line header such as `/*** STARTUP ***/`
fn section_title(text: &str) -> Option<(String, u8)> {
    let trimmed = text.trim();
    if trimmed.contains('\n') || !trimmed.starts_with('*') || !trimmed.ends_with('*') {
        return None;
    }
    let stars = trimmed.chars().take_while(|&c| c == '*').count();
    let title = trimmed.trim_matches('*').trim();
    if title.is_empty() {
        return None;
    }
    let level = if stars >= 2 { 1 } else { 2 };
    Some((title.to_string(), level))
}

/// Whether only whitespace precedes 1-indexed `column` on `line`
fn starts_line(lines: &[&str], line: usize, column: usize) -> bool {
    lines.get(line - 1).is_some_and(|text| {
        text.chars()
            .take(column - 1)
            .all(|c| c.is_whitespace() || c == '\u{feff}')
    })
}

fn clean_annotation(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Decide whether a `//` comment body is a disabled statement
fn classify_comment(text: &str, line: usize, column: usize) -> CommentKind {
    let body = text.trim_start();
    if !looks_like_pref_call(body) {
        return CommentKind::Plain;
    }

    let indent = text.chars().count() - body.chars().count();
    match parse_disabled_statement(body, line, column + indent) {
        Ok((statement, annotation)) => CommentKind::Disabled(statement, annotation),
        Err(e) => CommentKind::Malformed(e.to_string()),
    }
}

/// `user_pref (`, `pref(`, ... at the start of the body
fn looks_like_pref_call(body: &str) -> bool {
    let ident_len = body
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(body.len());
    PrefType::from_function(&body[..ident_len]).is_some()
        && body[ident_len..].trim_start().starts_with('(')
}

fn parse_disabled_statement(
    body: &str,
    line: usize,
    column: usize,
) -> Result<(Statement, Option<String>)> {
    let mut parser = Parser::new(Lexer::with_comments(body).starting_at(line, column))?;
    let statement = parser.parse_statement()?;

    let annotation = match &parser.current().token {
        Token::LineComment(text) => clean_annotation(text),
        _ => None,
    };
    if annotation.is_some() {
        parser.advance()?;
    }

    let rest = parser.current();
    if rest.token != Token::Eof {
        return Err(Error::Parser {
            line: rest.line,
            column: rest.column,
            message: format!("Unexpected {:?} after statement", rest.token),
        });
    }
    Ok((statement, annotation))
}

fn uncomment_line(text: &str) -> String {
    let body = text.trim_start();
    let indent = &text[..text.len() - body.len()];
    let uncommented = body.strip_prefix("//").unwrap_or(body);
    let uncommented = uncommented.strip_prefix(' ').unwrap_or(uncommented);
    format!("{}{}", indent, uncommented)
}

fn comment_line(text: &str) -> String {
    let body = text.trim_start();
    let indent = &text[..text.len() - body.len()];
    format!("{}// {}", indent, body)
}
