use crate::cli::{EntryState, OutputFormat};
use anyhow::Context;
use ffov::{
    build_user_js, bundled_overrides, find_profile_path, install_user_js, known_pref, lint,
    list_profiles, merge_preferences, parse_prefs_js, query_entries, InstallOptions, Issue,
    OverrideDocument, OverrideEntry, PrefValue, Severity,
};
use serde::Serialize;
use std::path::Path;

const BUNDLED_NAME: &str = "user-overrides.js (bundled)";

#[derive(Serialize)]
struct CheckOutput<'a> {
    file: String,
    active: usize,
    disabled: usize,
    errors: usize,
    warnings: usize,
    notes: usize,
    issues: &'a [Issue],
}

/// Lint an override file; returns whether errors were found
pub fn check(file: Option<&Path>, format: OutputFormat) -> anyhow::Result<bool> {
    let doc = load_overrides(file)?;
    let report = lint(&doc);
    let name = display_name(file);

    let errors = report.count(Severity::Error);
    let warnings = report.count(Severity::Warning);
    let notes = report.count(Severity::Note);

    match format {
        OutputFormat::Text => {
            for issue in &report.issues {
                println!("{}: {}", name, issue);
            }
            println!(
                "{}: {} active, {} disabled; {} error(s), {} warning(s), {} note(s)",
                name,
                doc.active().count(),
                doc.disabled().count(),
                errors,
                warnings,
                notes
            );
        }
        OutputFormat::Json => {
            let output = CheckOutput {
                file: name,
                active: doc.active().count(),
                disabled: doc.disabled().count(),
                errors,
                warnings,
                notes,
                issues: &report.issues,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(report.has_errors())
}

/// List entries as JSON, filtered by state and glob queries
pub fn list(file: Option<&Path>, queries: &[String], state: EntryState) -> anyhow::Result<()> {
    let doc = load_overrides(file)?;

    let selected: Vec<&OverrideEntry> = if queries.is_empty() {
        doc.entries().iter().collect()
    } else {
        let patterns: Vec<&str> = queries.iter().map(String::as_str).collect();
        query_entries(doc.entries(), &patterns)
            .map_err(|e| anyhow::anyhow!("Failed to apply query: {}", e))?
    };

    let filtered: Vec<&OverrideEntry> = selected
        .into_iter()
        .filter(|entry| match state {
            EntryState::All => true,
            EntryState::Active => entry.enabled,
            EntryState::Disabled => !entry.enabled,
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&filtered)?);
    Ok(())
}

/// Print the effective value of an active key in raw form
pub fn get(key: &str, file: Option<&Path>) -> anyhow::Result<()> {
    let doc = load_overrides(file)?;

    match doc.effective_value(key) {
        Some(value) => {
            output_raw_value(value);
            Ok(())
        }
        None if doc.find(key).next().is_some() => Err(anyhow::anyhow!(
            "Preference '{}' is disabled in {}. Use 'ffov enable {}' to activate it.",
            key,
            display_name(file),
            key
        )),
        None => Err(ffov::Error::PreferenceNotFound {
            key: key.to_string(),
        }
        .into()),
    }
}

/// Enable or disable `key`, printing the document or rewriting the file
pub fn toggle(key: &str, file: Option<&Path>, enabled: bool, in_place: bool) -> anyhow::Result<()> {
    let mut doc = load_overrides(file)?;
    let changed = doc.set_enabled(key, enabled)?;

    if changed == 0 {
        tracing::info!(key, enabled, "entry already in requested state");
    } else {
        tracing::info!(key, enabled, lines = changed, "toggled entry");
    }

    match (in_place, file) {
        (true, Some(path)) => {
            if changed > 0 {
                doc.write_to(path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
        }
        _ => print!("{}", doc.render()),
    }
    Ok(())
}

/// Concatenate overrides onto a base file, or report what they change
pub fn merge(
    base: &Path,
    overrides: Option<&Path>,
    output: Option<&Path>,
    report: bool,
) -> anyhow::Result<()> {
    let base_text = read_file(base)?;
    let doc = load_overrides(overrides)?;

    if report {
        let base_prefs = parse_prefs_js(&base_text)
            .with_context(|| format!("Failed to parse base file {}", base.display()))?;
        let merged = merge_preferences(&base_prefs, &doc.active_prefs());
        println!("{}", serde_json::to_string_pretty(&merged)?);
        return Ok(());
    }

    let merged = build_user_js(&base_text, &doc).with_context(|| {
        format!(
            "Merged file does not parse. Check {} for syntax errors.",
            base.display()
        )
    })?;

    match output {
        Some(path) => std::fs::write(path, merged)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", merged),
    }
    Ok(())
}

/// Install base + overrides as user.js into a profile
pub fn install(
    base: &Path,
    overrides: Option<&Path>,
    profile_name: &str,
    profiles_dir: Option<&Path>,
    options: &InstallOptions,
) -> anyhow::Result<()> {
    let profile_path = find_profile_path(profile_name, profiles_dir).map_err(|e| {
        anyhow::anyhow!(
            "Failed to find profile '{}': {}. Make sure Firefox is installed and the profile exists.\n\
             Use 'ffov profiles' to see available profiles.",
            profile_name,
            e
        )
    })?;

    let base_text = read_file(base)?;
    let doc = load_overrides(overrides)?;

    let report = install_user_js(&profile_path, &base_text, &doc, options).map_err(|e| match e {
        ffov::Error::ValidationFailed { errors } => anyhow::anyhow!(
            "Overrides have {} lint error(s); run 'ffov check' for details or pass --force.",
            errors
        ),
        other => anyhow::Error::new(other).context(format!(
            "Failed to install user.js into {}",
            profile_path.display()
        )),
    })?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// List all available Firefox profiles
pub fn profiles(profiles_dir: Option<&Path>) -> anyhow::Result<()> {
    let profiles = list_profiles(profiles_dir).map_err(|e| {
        anyhow::anyhow!(
            "Failed to list profiles: {}. Make sure Firefox is installed.",
            e
        )
    })?;

    println!("{}", serde_json::to_string_pretty(&profiles)?);
    Ok(())
}

/// Show the expected kind and explanation of a key
pub fn explain(key: &str) -> anyhow::Result<()> {
    let known = known_pref(key)
        .ok_or_else(|| anyhow::anyhow!("No explanation available for '{}'", key))?;
    println!("{} ({})", known.key, known.kind);
    println!("  {}", known.explanation);
    Ok(())
}

fn load_overrides(file: Option<&Path>) -> anyhow::Result<OverrideDocument> {
    match file {
        Some(path) => {
            let content = read_file(path)?;
            OverrideDocument::parse(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))
        }
        None => bundled_overrides().context("Failed to parse the bundled user-overrides.js"),
    }
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read {}. Make sure the file exists and is readable.",
            path.display()
        )
    })
}

fn display_name(file: Option<&Path>) -> String {
    file.map(|p| p.display().to_string())
        .unwrap_or_else(|| BUNDLED_NAME.to_string())
}

/// Output a single preference value in raw format (no quoting)
fn output_raw_value(value: &PrefValue) {
    match value {
        PrefValue::String(s) => println!("{}", s),
        other => println!("{}", other),
    }
}
