//! Installing a merged user.js into a profile
//!
//! This is the updater step: the base file and the override document are
//! concatenated, the result is parsed to prove the browser will read every
//! statement, the previous `user.js` is copied to `userjs_backups/`, and the
//! new file replaces it through a temp file in the same directory.

use crate::document::OverrideDocument;
use crate::error::{Error, Result};
use crate::lint::{lint, LintReport, Severity};
use crate::merge::{append_overrides, merge_preferences};
use crate::parser::parse_prefs_js;
use crate::profile::get_user_js_path;
use crate::types::MergedPreferences;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Directory inside the profile that receives previous user.js files
pub const BACKUP_DIR: &str = "userjs_backups";

/// Options for [`install_user_js`]
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Copy an existing user.js to the backup directory first
    pub backup: bool,
    /// Install even when the overrides have lint errors
    pub force: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            backup: true,
            force: false,
        }
    }
}

/// What [`install_user_js`] did
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub user_js: PathBuf,
    pub backup: Option<PathBuf>,
    pub merge: MergedPreferences,
    pub lint: LintReport,
}

/// Concatenate `overrides` onto `base` and check the result parses
pub fn build_user_js(base: &str, overrides: &OverrideDocument) -> Result<String> {
    let merged = append_overrides(base, &overrides.render());
    let statements = parse_prefs_js(&merged)?;
    tracing::debug!(statements = statements.len(), "built user.js");
    Ok(merged)
}

/// Write base + overrides as `user.js` into `profile_dir`
///
/// # Example
///
/// ```rust
/// use ffov::{install_user_js, InstallOptions, OverrideDocument};
///
/// let profile = tempfile::TempDir::new()?;
/// let overrides = OverrideDocument::parse("user_pref(\"browser.startup.page\", 3);\n")?;
///
/// let report = install_user_js(
///     profile.path(),
///     "user_pref(\"browser.startup.page\", 0);\n",
///     &overrides,
///     &InstallOptions::default(),
/// )?;
/// assert_eq!(report.merge.overridden.len(), 1);
/// assert!(report.backup.is_none());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn install_user_js(
    profile_dir: &Path,
    base: &str,
    overrides: &OverrideDocument,
    options: &InstallOptions,
) -> Result<InstallReport> {
    let report = lint(overrides);
    if report.has_errors() {
        for issue in report.at_least(Severity::Error) {
            tracing::warn!(%issue, "override lint error");
        }
        if !options.force {
            return Err(Error::ValidationFailed {
                errors: report.count(Severity::Error),
            });
        }
    }

    let base_prefs = parse_prefs_js(base)?;
    let content = build_user_js(base, overrides)?;
    let merge = merge_preferences(&base_prefs, &overrides.active_prefs());

    let user_js = get_user_js_path(profile_dir);
    let backup = if options.backup && user_js.exists() {
        Some(backup_user_js(profile_dir, &user_js)?)
    } else {
        None
    };

    write_atomically(&user_js, &content)?;
    tracing::info!(
        path = %user_js.display(),
        overridden = merge.overridden.len(),
        added = merge.added.len(),
        "installed user.js"
    );

    Ok(InstallReport {
        user_js,
        backup,
        merge,
        lint: report,
    })
}

fn backup_user_js(profile_dir: &Path, user_js: &Path) -> Result<PathBuf> {
    let dir = profile_dir.join(BACKUP_DIR);
    std::fs::create_dir_all(&dir)?;

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    let mut path = dir.join(format!("user.js.backup.{}", stamp));
    let mut n = 1;
    while path.exists() {
        path = dir.join(format!("user.js.backup.{}.{}", stamp, n));
        n += 1;
    }

    std::fs::copy(user_js, &path)?;
    tracing::info!(path = %path.display(), "backed up previous user.js");
    Ok(path)
}

/// Write through a temp file in the target directory, then rename
pub(crate) fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
