//! Lexer for tokenizing preference files
//!
//! Converts prefs.js / user.js text into tokens, handling JavaScript string
//! escapes and tracking line/column numbers for error reporting. Comments are
//! skipped by default; [`Lexer::with_comments`] keeps them as tokens so the
//! override document can see disabled entries and section headers.

use crate::error::{Error, Result};
use std::iter::Peekable;
use std::str::Chars;

/// Token types produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier (e.g., user_pref, pref, lock_pref, sticky_pref)
    Identifier(String),
    /// String value with escape sequences already processed
    String(String),
    /// Integer value
    Integer(i64),
    /// Boolean value
    Boolean(bool),
    /// Null value (never a valid preference value, kept for error messages)
    Null,
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    /// Text after `//`, up to the end of the line
    LineComment(String),
    /// Text between `/*` and `*/`
    BlockComment(String),
    /// End of input
    Eof,
}

/// A token with the position of its first character
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
    pub column: usize,
}

/// Lexer for tokenizing preference files
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
    keep_comments: bool,
}

impl<'a> Lexer<'a> {
    /// Create a lexer that skips comments
    pub fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
            keep_comments: false,
        }
    }

    /// Create a lexer that reports comments as tokens
    pub fn with_comments(input: &'a str) -> Self {
        Lexer {
            keep_comments: true,
            ..Lexer::new(input)
        }
    }

    /// Start counting lines at `line` instead of 1
    pub fn starting_at(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token> {
        self.next_spanned().map(|s| s.token)
    }

    /// Get the next token together with its position
    pub fn next_spanned(&mut self) -> Result<Spanned> {
        loop {
            self.skip_whitespace();

            let (line, column) = (self.line, self.column);
            let Some(&c) = self.chars.peek() else {
                return Ok(Spanned {
                    token: Token::Eof,
                    line,
                    column,
                });
            };

            let token = match c {
                '(' => {
                    self.bump();
                    Token::LeftParen
                }
                ')' => {
                    self.bump();
                    Token::RightParen
                }
                ',' => {
                    self.bump();
                    Token::Comma
                }
                ';' => {
                    self.bump();
                    Token::Semicolon
                }
                '/' => match self.lex_comment(line, column)? {
                    Some(token) => token,
                    None => continue,
                },
                '"' => self.lex_string()?,
                '-' | '0'..='9' => self.lex_number()?,
                'a'..='z' | 'A'..='Z' | '_' => self.lex_identifier(),
                _ => {
                    return Err(Error::Lexer {
                        message: format!("Unexpected character: '{}'", c),
                        line,
                        column,
                    })
                }
            };

            return Ok(Spanned {
                token,
                line,
                column,
            });
        }
    }

    /// Consume one character, keeping line/column in sync
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c == ' ' || c == '\t' || c == '\r' || c == '\n' || c == '\u{feff}' {
                self.bump();
            } else {
                break;
            }
        }
    }

    /// Lex `// ...` or `/* ... */`. Returns `None` when comments are skipped.
    fn lex_comment(&mut self, line: usize, column: usize) -> Result<Option<Token>> {
        // Opening slash
        self.bump();

        match self.chars.peek() {
            Some(&'/') => {
                self.bump();
                let mut text = String::new();
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    text.push(c);
                    self.bump();
                }
                if text.ends_with('\r') {
                    text.pop();
                }
                Ok(self.keep_comments.then_some(Token::LineComment(text)))
            }
            Some(&'*') => {
                self.bump();
                let mut text = String::new();
                loop {
                    match self.bump() {
                        Some('*') if self.chars.peek() == Some(&'/') => {
                            self.bump();
                            break;
                        }
                        Some(c) => text.push(c),
                        None => {
                            return Err(Error::Lexer {
                                message: "Unterminated block comment".to_string(),
                                line,
                                column,
                            })
                        }
                    }
                }
                Ok(self.keep_comments.then_some(Token::BlockComment(text)))
            }
            _ => Err(Error::Lexer {
                message: "Unexpected character: '/'".to_string(),
                line,
                column,
            }),
        }
    }

    /// Lex an identifier (e.g., user_pref, pref, true, false, null)
    fn lex_identifier(&mut self) -> Token {
        let mut ident = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "true" => Token::Boolean(true),
            "false" => Token::Boolean(false),
            "null" => Token::Null,
            _ => Token::Identifier(ident),
        }
    }

    /// Lex a string literal (only double-quoted strings in prefs.js)
    fn lex_string(&mut self) -> Result<Token> {
        let (start_line, start_col) = (self.line, self.column);

        // Opening quote
        self.bump();

        let mut result = String::new();

        loop {
            match self.bump() {
                Some('"') => return Ok(Token::String(result)),
                Some('\\') => self.lex_escape(&mut result)?,
                Some(c) => result.push(c),
                None => {
                    return Err(Error::Lexer {
                        message: "Unterminated string literal".to_string(),
                        line: start_line,
                        column: start_col,
                    });
                }
            }
        }
    }

    /// Decode the escape sequence following a backslash
    fn lex_escape(&mut self, result: &mut String) -> Result<()> {
        let (line, column) = (self.line, self.column);
        match self.bump() {
            Some('"') => result.push('"'),
            Some('\'') => result.push('\''),
            Some('\\') => result.push('\\'),
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('b') => result.push('\x08'),
            Some('f') => result.push('\x0c'),
            Some('0') => {
                if self.chars.peek() == Some(&'0') {
                    return Err(Error::Lexer {
                        message: "Octal escape sequences are not supported. Use \\x00 instead."
                            .to_string(),
                        line,
                        column,
                    });
                }
                result.push('\x00');
            }
            Some('x') => {
                let code = self.lex_hex_digits(2, "hex")?;
                // Two hex digits always fit a Latin-1 code point
                result.push(char::from(code as u8));
            }
            Some('u') => {
                let unit = self.lex_hex_digits(4, "unicode")?;
                let decoded = if (0xD800..0xDC00).contains(&unit) {
                    self.lex_low_surrogate(unit)?
                } else {
                    char::from_u32(unit)
                };
                result.push(decoded.unwrap_or('\u{FFFD}'));
            }
            Some(c) => {
                return Err(Error::Lexer {
                    message: format!("Invalid escape sequence: \\{}", c),
                    line,
                    column,
                });
            }
            None => {
                return Err(Error::Lexer {
                    message: "Unexpected end of input in escape sequence".to_string(),
                    line,
                    column,
                });
            }
        }
        Ok(())
    }

    fn lex_hex_digits(&mut self, count: usize, what: &str) -> Result<u32> {
        let mut hex = String::new();
        for _ in 0..count {
            match self.chars.peek() {
                Some(&c) if c.is_ascii_hexdigit() => {
                    hex.push(c);
                    self.bump();
                }
                _ => break,
            }
        }
        if hex.len() != count {
            return Err(Error::Lexer {
                message: format!("Incomplete {} escape: {}", what, hex),
                line: self.line,
                column: self.column,
            });
        }
        u32::from_str_radix(&hex, 16).map_err(|_| Error::Lexer {
            message: format!("Invalid {} escape: {}", what, hex),
            line: self.line,
            column: self.column,
        })
    }

    /// Combine a UTF-16 high surrogate with the `\uDCxx` that should follow it
    fn lex_low_surrogate(&mut self, high: u32) -> Result<Option<char>> {
        if self.chars.peek() != Some(&'\\') {
            return Ok(None);
        }
        self.bump();
        if self.bump() != Some('u') {
            return Err(Error::Lexer {
                message: "Expected \\u low surrogate after high surrogate".to_string(),
                line: self.line,
                column: self.column,
            });
        }
        let low = self.lex_hex_digits(4, "unicode")?;
        if !(0xDC00..0xE000).contains(&low) {
            return Ok(None);
        }
        Ok(char::from_u32(
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00),
        ))
    }

    /// Lex an integer literal
    fn lex_number(&mut self) -> Result<Token> {
        let (line, start_col) = (self.line, self.column);

        let mut num_str = String::new();

        if self.chars.peek() == Some(&'-') {
            num_str.push('-');
            self.bump();
        }

        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                num_str.push(c);
                self.bump();
            } else {
                break;
            }
        }

        if let Some(&('.' | 'e' | 'E')) = self.chars.peek() {
            return Err(Error::Lexer {
                message: "Floating point values are not supported; store them as strings"
                    .to_string(),
                line,
                column: start_col,
            });
        }

        num_str.parse::<i64>().map(Token::Integer).map_err(|_| Error::Lexer {
            message: format!("Failed to parse integer: {}", num_str),
            line,
            column: start_col,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_basic_tokens() {
        let mut lexer = Lexer::new("( ) , ;");

        assert_eq!(lexer.next_token().unwrap(), Token::LeftParen);
        assert_eq!(lexer.next_token().unwrap(), Token::RightParen);
        assert_eq!(lexer.next_token().unwrap(), Token::Comma);
        assert_eq!(lexer.next_token().unwrap(), Token::Semicolon);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }

    #[test]
    fn test_lexer_skips_comments_by_default() {
        let mut lexer = Lexer::new("( // trailing\n /* block\ncomment */ )");

        assert_eq!(lexer.next_token().unwrap(), Token::LeftParen);
        assert_eq!(lexer.next_token().unwrap(), Token::RightParen);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }

    #[test]
    fn test_lexer_keeps_comments() {
        let mut lexer = Lexer::with_comments("/*** HEADER ***/\n; // note\r\n");

        assert_eq!(
            lexer.next_token().unwrap(),
            Token::BlockComment("** HEADER **".to_string())
        );
        assert_eq!(lexer.next_token().unwrap(), Token::Semicolon);
        assert_eq!(
            lexer.next_token().unwrap(),
            Token::LineComment(" note".to_string())
        );
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }

    #[test]
    fn test_lexer_positions() {
        let mut lexer = Lexer::new("\n  user_pref(\"a\", 1);");

        let first = lexer.next_spanned().unwrap();
        assert_eq!(first.token, Token::Identifier("user_pref".to_string()));
        assert_eq!((first.line, first.column), (2, 3));

        let paren = lexer.next_spanned().unwrap();
        assert_eq!((paren.line, paren.column), (2, 12));
    }

    #[test]
    fn test_lexer_starting_at() {
        let mut lexer = Lexer::new("x").starting_at(40, 3);
        let token = lexer.next_spanned().unwrap();
        assert_eq!((token.line, token.column), (40, 3));
    }

    #[test]
    fn test_lexer_unterminated_block_comment() {
        let mut lexer = Lexer::new("/* never closed");
        assert!(matches!(
            lexer.next_token(),
            Err(Error::Lexer { line: 1, column: 1, .. })
        ));
    }

    #[test]
    fn test_lexer_lone_slash() {
        let mut lexer = Lexer::new("/ x");
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn test_lexer_identifiers_and_keywords() {
        let mut lexer = Lexer::new("user_pref sticky_pref true false null");

        assert_eq!(
            lexer.next_token().unwrap(),
            Token::Identifier("user_pref".to_string())
        );
        assert_eq!(
            lexer.next_token().unwrap(),
            Token::Identifier("sticky_pref".to_string())
        );
        assert_eq!(lexer.next_token().unwrap(), Token::Boolean(true));
        assert_eq!(lexer.next_token().unwrap(), Token::Boolean(false));
        assert_eq!(lexer.next_token().unwrap(), Token::Null);
    }

    #[test]
    fn test_lexer_string_escaped_quotes() {
        let mut lexer = Lexer::new(r#""{\"screen\":\"\",\"complete\":true}""#);

        assert_eq!(
            lexer.next_token().unwrap(),
            Token::String("{\"screen\":\"\",\"complete\":true}".to_string())
        );
    }

    #[test]
    fn test_lexer_string_escapes() {
        let mut lexer = Lexer::new(r#""C:\\dir\tx\n\x41\u0042\b\f\0""#);
        assert_eq!(
            lexer.next_token().unwrap(),
            Token::String("C:\\dir\tx\nAB\x08\x0c\x00".to_string())
        );
    }

    #[test]
    fn test_lexer_string_surrogate_pair() {
        let mut lexer = Lexer::new(r#""\uD83E\uDD8A""#);
        assert_eq!(lexer.next_token().unwrap(), Token::String("🦊".to_string()));
    }

    #[test]
    fn test_lexer_string_octal_escape_rejected() {
        let mut lexer = Lexer::new(r#""test\00""#);
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn test_lexer_string_incomplete_hex() {
        let mut lexer = Lexer::new(r#""\x4""#);
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn test_lexer_unterminated_string() {
        let mut lexer = Lexer::new("\"open");
        assert!(matches!(
            lexer.next_token(),
            Err(Error::Lexer { line: 1, column: 1, .. })
        ));
    }

    #[test]
    fn test_lexer_integers() {
        let mut lexer = Lexer::new("42 -7 204800");

        assert_eq!(lexer.next_token().unwrap(), Token::Integer(42));
        assert_eq!(lexer.next_token().unwrap(), Token::Integer(-7));
        assert_eq!(lexer.next_token().unwrap(), Token::Integer(204800));
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }

    #[test]
    fn test_lexer_rejects_floats() {
        assert!(Lexer::new("2.5").next_token().is_err());
        assert!(Lexer::new("1e10").next_token().is_err());
    }

    #[test]
    fn test_lexer_bare_minus() {
        assert!(Lexer::new("- 1").next_token().is_err());
    }

    #[test]
    fn test_lexer_statement() {
        let mut lexer = Lexer::new(r#"user_pref("key", 3);"#);

        assert_eq!(
            lexer.next_token().unwrap(),
            Token::Identifier("user_pref".to_string())
        );
        assert_eq!(lexer.next_token().unwrap(), Token::LeftParen);
        assert_eq!(lexer.next_token().unwrap(), Token::String("key".to_string()));
        assert_eq!(lexer.next_token().unwrap(), Token::Comma);
        assert_eq!(lexer.next_token().unwrap(), Token::Integer(3));
        assert_eq!(lexer.next_token().unwrap(), Token::RightParen);
        assert_eq!(lexer.next_token().unwrap(), Token::Semicolon);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}
