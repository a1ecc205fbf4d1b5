// Example: Merge overrides onto a base user.js
//
// Shows which base values the bundled overrides change, which keys they add,
// and which ones are already set to the same value in the base.

use ffov::{bundled_overrides, merge_preferences, parse_prefs_js_file};
use std::env;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let base_path = if args.len() > 1 {
        Path::new(&args[1])
    } else {
        eprintln!("Usage: {} <user.js path>", args[0]);
        eprintln!("Example: {} tests/fixtures/base-user.js", args[0]);
        return Ok(());
    };

    let base = parse_prefs_js_file(base_path)?;
    let overrides = bundled_overrides()?;
    let merged = merge_preferences(&base, &overrides.active_prefs());

    println!("Base: {} ({} statements)", base_path.display(), base.len());
    println!("Resulting preferences: {}", merged.entries.len());

    println!("\nOverridden:");
    for change in &merged.overridden {
        println!("  {:<50} {} -> {}", change.key, change.previous, change.value);
    }

    println!("\nAdded: {}", merged.added.len());
    for key in merged.added.iter().take(10) {
        println!("  {}", key);
    }
    if merged.added.len() > 10 {
        println!("  ... and {} more", merged.added.len() - 10);
    }

    if !merged.redundant.is_empty() {
        println!("\nAlready set by the base:");
        for key in &merged.redundant {
            println!("  {}", key);
        }
    }

    Ok(())
}
