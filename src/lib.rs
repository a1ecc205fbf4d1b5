//! # ffov - Firefox user-overrides toolkit
//!
//! This library reads, checks and applies Firefox override files: the
//! `user-overrides.js` list that an updater appends to a hardened base
//! `user.js` (arkenfox style) before the browser loads it. It keeps every
//! comment and disabled entry intact, so a file can be edited and written back
//! byte for byte.
//!
//! ## Features
//!
//! - Parse prefs.js/user.js statements with full JavaScript escape sequence support
//! - Model an override file as active entries, disabled (`//`-commented) entries,
//!   trailing annotations and section headers
//! - Enable or disable an entry in place without touching the rest of the file
//! - Lint an override file: key shape, duplicate consistency, value types of
//!   well-known keys, and whether disabled entries would still parse
//! - Merge overrides onto a base file with last-wins precedence and report what changed
//! - Locate Firefox profiles and install the merged `user.js` with a backup
//! - Query entries using glob patterns (e.g., `"privacy.*"`, `"browser.*.enabled"`)
//!
//! ## Quick Start
//!
//! ### Reading an Override File
//!
//! ```rust
//! use ffov::{OverrideDocument, PrefValue};
//!
//! let doc = OverrideDocument::parse(r#"
//! /*** STARTUP ***/
//! user_pref("browser.startup.page", 3); // resume previous session
//! // user_pref("privacy.resistFingerprinting", true);
//! "#)?;
//!
//! assert_eq!(doc.active().count(), 1);
//! assert_eq!(doc.disabled().count(), 1);
//! assert_eq!(doc.effective_value("browser.startup.page"), Some(&PrefValue::Integer(3)));
//! assert_eq!(doc.sections()[0].title, "STARTUP");
//! # Ok::<(), ffov::Error>(())
//! ```
//!
//! ### Parsing Plain Preference Files
//!
//! ```rust
//! use ffov::{parse_prefs_js, PrefType, PrefValue};
//!
//! let content = r#"
//!     user_pref("browser.startup.homepage", "https://example.com");
//!     pref("javascript.enabled", true);
//!     lock_pref("security.default_ssl_enabled", false);
//! "#;
//!
//! let prefs = parse_prefs_js(content)?;
//! let homepage = prefs.iter()
//!     .find(|e| e.key == "browser.startup.homepage")
//!     .unwrap();
//! assert_eq!(homepage.value, PrefValue::String("https://example.com".to_string()));
//! assert_eq!(homepage.pref_type, PrefType::User);
//! # Ok::<(), ffov::Error>(())
//! ```
//!
//! ### Linting
//!
//! ```rust
//! use ffov::{lint, OverrideDocument, Rule};
//!
//! let doc = OverrideDocument::parse(r#"
//! user_pref("browser.startup.page", "3");
//! "#)?;
//!
//! let report = lint(&doc);
//! assert!(report.has_errors());
//! assert_eq!(report.issues[0].rule, Rule::TypeMismatch);
//! # Ok::<(), ffov::Error>(())
//! ```
//!
//! ### Toggling Entries
//!
//! ```rust
//! use ffov::OverrideDocument;
//!
//! let mut doc = OverrideDocument::parse("// user_pref(\"webgl.disabled\", true);\n")?;
//! assert_eq!(doc.enable("webgl.disabled")?, 1);
//! assert_eq!(doc.render(), "user_pref(\"webgl.disabled\", true);\n");
//! # Ok::<(), ffov::Error>(())
//! ```
//!
//! ### Installing into a Profile
//!
//! ```rust,no_run
//! use ffov::{bundled_overrides, find_profile_path, install_user_js, InstallOptions};
//!
//! let profile = find_profile_path("default", None)?;
//! let base = std::fs::read_to_string("user.js")?;
//! let report = install_user_js(&profile, &base, &bundled_overrides()?, &InstallOptions::default())?;
//!
//! println!("wrote {}", report.user_js.display());
//! for change in &report.merge.overridden {
//!     println!("{}: {} -> {}", change.key, change.previous, change.value);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Preference Types
//!
//! Firefox supports four preference types, indicated by the function name used:
//!
//! - **user_pref()** - [`PrefType::User`]: User-set preferences (the only kind an override file should use)
//! - **pref()** - [`PrefType::Default`]: Application defaults
//! - **lock_pref()** - [`PrefType::Locked`]: Locked preferences (cannot be changed by users)
//! - **sticky_pref()** - [`PrefType::Sticky`]: Sticky preferences (persist across updates)
//!
//! ## Error Handling
//!
//! Library functions return [`Result<T, Error>`]. Lint findings are not
//! errors; they are returned as data in a [`LintReport`].
//!
//! ```rust
//! use ffov::{OverrideDocument, Error};
//!
//! match OverrideDocument::parse("user_pref(\"a.b\" 1);") {
//!     Ok(_) => println!("Parsed successfully"),
//!     Err(Error::Parser { line, column, message }) => {
//!         eprintln!("Parse error at {}:{}: {}", line, column, message);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```
//!
//! ## See Also
//!
//! - [arkenfox user.js](https://github.com/arkenfox/user.js)
//! - [prefs.js format reference](https://searchfox.org/mozilla-central/source/modules/libpref/parser/src/lib.rs)

// Re-export all public types at crate root
pub use types::{
    MergedPreferences, OverrideEntry, PrefChange, PrefEntry, PrefType, PrefValue, PrefValueExt,
    ValueKind,
};

// Re-export error types
pub use error::{Error, Result};

// Re-export the override document model
pub use document::{MalformedEntry, OverrideDocument, Section};

// Re-export lint and schema
pub use lint::{is_valid_key, lint, Issue, LintReport, Rule, Severity};
pub use schema::{known_pref, known_prefs, KnownPref};

// Re-export all public functions at crate root
pub use merge::{append_overrides, get_effective_pref, merge_preferences};
pub use parser::{parse_prefs_js, parse_prefs_js_file};
pub use query::{query_entries, Keyed};

// Re-export profile discovery and install
pub use install::{build_user_js, install_user_js, InstallOptions, InstallReport, BACKUP_DIR};
pub use profile::{
    find_profile_path, get_profiles_directory, get_user_js_path, list_profiles, ProfileInfo,
};

/// The override file shipped with this crate
pub const BUNDLED_OVERRIDES: &str = include_str!("../data/user-overrides.js");

/// Parse [`BUNDLED_OVERRIDES`]
pub fn bundled_overrides() -> Result<OverrideDocument> {
    OverrideDocument::parse(BUNDLED_OVERRIDES)
}

// All modules are private - use re-exports above for public API
mod document;
mod error;
mod install;
mod lexer;
mod lint;
mod merge;
mod parser;
mod profile;
mod query;
mod schema;
mod types;
