//! Error types for override parsing and operations
//!
//! All public library functions return [`Result<T, Error>`]. Profile discovery
//! and the command layer wrap these in `anyhow` with extra context.

/// Errors that can occur while reading, editing or installing override files
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Lexer error during tokenization
    #[error("Lexer error at line {line}, column {column}: {message}")]
    Lexer {
        line: usize,
        column: usize,
        message: String,
    },

    /// Parser error during parsing
    #[error("Parser error at line {line}, column {column}: {message}")]
    Parser {
        line: usize,
        column: usize,
        message: String,
    },

    /// Invalid preference type or value
    #[error("Invalid preference: {0}")]
    InvalidPreference(String),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No entry (active or disabled) declares the key
    #[error("Preference '{key}' not found")]
    PreferenceNotFound { key: String },

    /// Enabling an entry would contradict an active entry for the same key
    #[error("Preference '{key}' is already active at line {line} with value {existing}")]
    ConflictingOverride {
        key: String,
        line: usize,
        existing: String,
    },

    /// Toggling only works on entries written on a single line
    #[error("Preference '{key}' at line {line} spans several lines and cannot be toggled")]
    MultilineEntry { key: String, line: usize },

    /// Toggling would also change other content on the entry's line
    #[error("Preference '{key}' at line {line} shares its line with other content and cannot be toggled")]
    SharedLine { key: String, line: usize },

    /// Invalid glob pattern in query
    #[error("Invalid glob pattern: {0}")]
    InvalidGlobPattern(String),

    /// The override file has lint errors
    #[error("Override file failed validation with {errors} error(s)")]
    ValidationFailed { errors: usize },
}

/// Result type alias for convenience
///
/// # Example
///
/// ```rust
/// use ffov::{Result, OverrideDocument};
///
/// fn count_active(content: &str) -> Result<usize> {
///     let doc = OverrideDocument::parse(content)?;
///     Ok(doc.active().count())
/// }
/// # assert_eq!(count_active("user_pref(\"a.b\", 1);").unwrap(), 1);
/// ```
pub type Result<T> = std::result::Result<T, Error>;
