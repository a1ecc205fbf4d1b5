//! Parser for preference files (prefs.js / user.js)
//!
//! A recursive descent parser over [`Lexer`] tokens. [`parse_prefs_js`] reads
//! plain files such as an arkenfox `user.js`, discarding comments. The
//! statement parser is shared with [`crate::OverrideDocument`], which drives
//! it with a comment-preserving lexer.
//!
//! # Format
//!
//! ```text
//! user_pref("preference.name", value);
//! pref("preference.name", value);           // default
//! lock_pref("preference.name", value);      // locked
//! sticky_pref("preference.name", value);    // sticky
//! ```
//!
//! # Example
//!
//! ```rust
//! use ffov::{parse_prefs_js, PrefType, PrefValue};
//!
//! let content = r#"
//!     // This is a comment
//!     user_pref("browser.startup.page", 3);
//!     pref("browser.search.suggest.enabled", true);
//! "#;
//!
//! let prefs = parse_prefs_js(content)?;
//! assert_eq!(prefs[0].value, PrefValue::Integer(3));
//! assert_eq!(prefs[1].pref_type, PrefType::Default);
//! # Ok::<(), ffov::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::lexer::{Lexer, Spanned, Token};
use crate::types::{PrefEntry, PrefType, PrefValue};
use std::path::Path;

/// Parse a preference file and extract all active statements in order
///
/// Duplicate keys are kept; use [`crate::get_effective_pref`] for last-wins
/// lookup.
pub fn parse_prefs_js(content: &str) -> Result<Vec<PrefEntry>> {
    let mut parser = Parser::new(Lexer::new(content))?;
    let mut preferences = Vec::new();

    while parser.current().token != Token::Eof {
        let statement = parser.parse_statement()?;
        preferences.push(PrefEntry {
            key: statement.key,
            value: statement.value,
            pref_type: statement.pref_type,
            line: statement.line,
        });
    }

    tracing::debug!(count = preferences.len(), "parsed preference file");
    Ok(preferences)
}

/// Parse a preference file directly from a file path
pub fn parse_prefs_js_file(path: &Path) -> Result<Vec<PrefEntry>> {
    let content = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), "reading preference file");
    parse_prefs_js(&content)
}

/// One `fn("key", value);` statement
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Statement {
    pub key: String,
    pub value: PrefValue,
    pub pref_type: PrefType,
    pub line: usize,
    /// Line of the closing semicolon
    pub end_line: usize,
}

/// Statement parser with one token of lookahead
pub(crate) struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Spanned,
}

impl<'a> Parser<'a> {
    /// Create a parser and load the first token
    pub(crate) fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_spanned()?;
        Ok(Parser { lexer, current })
    }

    /// The lookahead token
    pub(crate) fn current(&self) -> &Spanned {
        &self.current
    }

    /// Move to the next token, including comments
    pub(crate) fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_spanned()?;
        Ok(())
    }

    /// Move to the next token, skipping comments inside a statement
    fn advance_in_statement(&mut self) -> Result<()> {
        loop {
            self.advance()?;
            match self.current.token {
                Token::LineComment(_) | Token::BlockComment(_) => continue,
                _ => return Ok(()),
            }
        }
    }

    /// Parse `pref_function "(" key "," value ")" ";"`
    ///
    /// Leaves the token after the semicolon as lookahead, so a trailing
    /// comment is visible to the caller.
    pub(crate) fn parse_statement(&mut self) -> Result<Statement> {
        let line = self.current.line;
        let pref_type = self.parse_pref_type_identifier()?;

        self.expect_token(Token::LeftParen)?;
        let key = self.expect_string()?;
        self.expect_token(Token::Comma)?;
        let value = self.parse_value()?;
        self.expect_token(Token::RightParen)?;

        let end_line = self.current.line;
        if self.current.token != Token::Semicolon {
            return Err(self.error(format!("Expected Semicolon, got {:?}", self.current.token)));
        }
        self.advance()?;

        Ok(Statement {
            key,
            value,
            pref_type,
            line,
            end_line,
        })
    }

    fn parse_pref_type_identifier(&mut self) -> Result<PrefType> {
        let pref_type = match &self.current.token {
            Token::Identifier(ident) => PrefType::from_function(ident).ok_or_else(|| {
                self.error(format!(
                    "Unknown pref function '{}'. Expected user_pref, pref, lock_pref, or sticky_pref",
                    ident
                ))
            })?,
            other => {
                return Err(self.error(format!(
                    "Expected pref function name (user_pref, pref, lock_pref, sticky_pref), got {:?}",
                    other
                )))
            }
        };
        self.advance_in_statement()?;
        Ok(pref_type)
    }

    fn parse_value(&mut self) -> Result<PrefValue> {
        let value = match &self.current.token {
            Token::String(s) => PrefValue::String(s.clone()),
            Token::Integer(n) => PrefValue::Integer(*n),
            Token::Boolean(b) => PrefValue::Bool(*b),
            Token::Null => {
                return Err(self.error("null is not a valid preference value".to_string()))
            }
            Token::Eof => return Err(self.error("Unexpected end of input".to_string())),
            other => return Err(self.error(format!("Expected value, got {:?}", other))),
        };
        self.advance_in_statement()?;
        Ok(value)
    }

    fn expect_token(&mut self, expected: Token) -> Result<()> {
        if self.current.token == expected {
            self.advance_in_statement()
        } else if self.current.token == Token::Eof {
            Err(self.error("Unexpected end of input".to_string()))
        } else {
            Err(self.error(format!(
                "Expected {:?}, got {:?}",
                expected, self.current.token
            )))
        }
    }

    fn expect_string(&mut self) -> Result<String> {
        let key = match &self.current.token {
            Token::String(s) => s.clone(),
            Token::Eof => return Err(self.error("Unexpected end of input".to_string())),
            other => return Err(self.error(format!("Expected string, got {:?}", other))),
        };
        self.advance_in_statement()?;
        Ok(key)
    }

    fn error(&self, message: String) -> Error {
        Error::Parser {
            line: self.current.line,
            column: self.current.column,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrefValueExt;

    #[test]
    fn test_parse_string() {
        let input = r#"user_pref("browser.toolbars.bookmarks.visibility", "always");"#;
        let result = parse_prefs_js(input).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].key, "browser.toolbars.bookmarks.visibility");
        assert_eq!(result[0].value, PrefValue::String("always".to_string()));
        assert_eq!(result[0].pref_type, PrefType::User);
        assert_eq!(result[0].line, 1);
    }

    #[test]
    fn test_parse_boolean_and_integer() {
        let input = r#"
            user_pref("browser.formfill.enable", false);
            user_pref("browser.startup.page", 3);
        "#;
        let result = parse_prefs_js(input).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].value.as_bool(), Some(false));
        assert_eq!(result[1].value.as_i64(), Some(3));
        assert_eq!(result[1].line, 3);
    }

    #[test]
    fn test_parse_all_pref_functions() {
        let input = r#"
            pref("a.b", 1);
            lock_pref("c.d", true);
            sticky_pref("e.f", "x");
        "#;
        let result = parse_prefs_js(input).unwrap();
        let types: Vec<PrefType> = result.iter().map(|e| e.pref_type).collect();
        assert_eq!(
            types,
            vec![PrefType::Default, PrefType::Locked, PrefType::Sticky]
        );
    }

    #[test]
    fn test_parse_ignores_comments() {
        let input = r#"
            /*** SECTION ***/
            // user_pref("disabled.pref", true);
            user_pref("active.pref", true); // trailing
        "#;
        let result = parse_prefs_js(input).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].key, "active.pref");
    }

    #[test]
    fn test_parse_keeps_duplicates_in_order() {
        let input = r#"
            user_pref("browser.ml.enable", true);
            user_pref("browser.ml.enable", false);
        "#;
        let result = parse_prefs_js(input).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].value, PrefValue::Bool(false));
    }

    #[test]
    fn test_parse_json_string_value() {
        let input = r#"user_pref("browser.firefox-view.feature-tour", "{\"screen\":\"\",\"complete\":true}");"#;
        let result = parse_prefs_js(input).unwrap();
        assert_eq!(
            result[0].value.as_str(),
            Some("{\"screen\":\"\",\"complete\":true}")
        );
    }

    #[test]
    fn test_parse_comment_inside_statement() {
        let input = r#"user_pref("a.b", /* three */ 3);"#;
        let result = parse_prefs_js(input).unwrap();
        assert_eq!(result[0].value, PrefValue::Integer(3));
    }

    #[test]
    fn test_parse_multiline_statement() {
        let input = "user_pref(\n  \"a.b\",\n  3\n);";
        let mut parser = Parser::new(Lexer::new(input)).unwrap();
        let statement = parser.parse_statement().unwrap();
        assert_eq!(statement.line, 1);
        assert_eq!(statement.end_line, 4);
    }

    #[test]
    fn test_parse_unknown_function() {
        let err = parse_prefs_js(r#"set_pref("a", 1);"#).unwrap_err();
        match err {
            Error::Parser { line, column, message } => {
                assert_eq!((line, column), (1, 1));
                assert!(message.contains("Unknown pref function"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_missing_semicolon() {
        let err = parse_prefs_js(r#"user_pref("a", 1)"#).unwrap_err();
        assert!(matches!(err, Error::Parser { .. }));
    }

    #[test]
    fn test_parse_null_rejected() {
        let err = parse_prefs_js(r#"user_pref("a", null);"#).unwrap_err();
        assert!(err.to_string().contains("null"));
    }

    #[test]
    fn test_parse_lexer_error_propagates() {
        let err = parse_prefs_js(r#"user_pref("a", 2.5);"#).unwrap_err();
        assert!(matches!(err, Error::Lexer { .. }));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_prefs_js("").unwrap().is_empty());
        assert!(parse_prefs_js("/* only a comment */\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("user.js");
        std::fs::write(&path, "user_pref(\"a.b\", true);\n").unwrap();
        let result = parse_prefs_js_file(&path).unwrap();
        assert_eq!(result.len(), 1);
    }
}
