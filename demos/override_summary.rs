//! Summarize an override file
//!
//! Prints every entry grouped by section, marking disabled entries, followed
//! by the lint findings. Uses the bundled file when no path is given.

use ffov::{bundled_overrides, lint, OverrideDocument, PrefValue};
use std::env;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let doc = match env::args().nth(1) {
        Some(path) => OverrideDocument::from_file(Path::new(&path))?,
        None => bundled_overrides()?,
    };

    let mut current_section: Option<&str> = None;
    for entry in doc.entries() {
        let section = entry.section.as_deref();
        if section != current_section {
            println!("\n[{}]", section.unwrap_or("(no section)"));
            current_section = section;
        }

        let value_str = match &entry.value {
            PrefValue::String(s) if s.chars().count() > 30 => {
                format!("\"{}...\"", s.chars().take(27).collect::<String>())
            }
            other => other.to_string(),
        };
        let marker = if entry.enabled { ' ' } else { '#' };

        println!("{} {:<55} {}", marker, entry.key, value_str);
        if let Some(note) = &entry.annotation {
            println!("    {}", note);
        }
    }

    println!("\n{:-<80}", "");
    println!(
        "{} active, {} disabled, {} sections",
        doc.active().count(),
        doc.disabled().count(),
        doc.sections().len()
    );

    let report = lint(&doc);
    for issue in &report.issues {
        println!("{}", issue);
    }

    Ok(())
}
