use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for ffov
#[derive(Parser, Debug)]
#[command(name = "ffov")]
#[command(about = "Check, edit and install Firefox user-overrides.js files")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Firefox profiles directory (contains profiles.ini)
    #[arg(long, global = true, env = "MOZ_PROFILES_DIR")]
    pub profiles_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lint an override file (the bundled one when FILE is omitted)
    Check {
        file: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List entries as JSON
    List {
        file: Option<PathBuf>,

        /// Glob pattern over keys (e.g., "privacy.*"); repeat for OR
        #[arg(short, long = "query")]
        queries: Vec<String>,

        #[arg(long, value_enum, default_value_t = EntryState::All)]
        state: EntryState,
    },

    /// Print the effective value of an active key
    Get { key: String, file: Option<PathBuf> },

    /// Uncomment a disabled entry
    Enable {
        key: String,
        file: Option<PathBuf>,

        /// Rewrite FILE instead of printing the result
        #[arg(short, long, requires = "file")]
        in_place: bool,
    },

    /// Comment out an active entry
    Disable {
        key: String,
        file: Option<PathBuf>,

        /// Rewrite FILE instead of printing the result
        #[arg(short, long, requires = "file")]
        in_place: bool,
    },

    /// Append the overrides to a base user.js
    Merge {
        #[arg(long)]
        base: PathBuf,

        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Write the merged file here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print what the overrides change as JSON instead of the merged file
        #[arg(long)]
        report: bool,
    },

    /// Write base + overrides as user.js into a profile
    Install {
        #[arg(long)]
        base: PathBuf,

        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Firefox profile name
        #[arg(short, long, default_value = "default")]
        profile: String,

        /// Do not back up an existing user.js
        #[arg(long)]
        no_backup: bool,

        /// Install even if the overrides have lint errors
        #[arg(long)]
        force: bool,
    },

    /// List available Firefox profiles
    Profiles,

    /// Show the expected type and meaning of a preference
    Explain { key: String },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    All,
    Active,
    Disabled,
}
