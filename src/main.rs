mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // FFOV_LOG takes precedence over -v
    let filter = EnvFilter::try_from_env("FFOV_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("ffov={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let profiles_dir = cli.profiles_dir.as_deref();

    match cli.command {
        Commands::Check { file, format } => {
            if commands::check(file.as_deref(), format)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::List {
            file,
            queries,
            state,
        } => commands::list(file.as_deref(), &queries, state)?,
        Commands::Get { key, file } => commands::get(&key, file.as_deref())?,
        Commands::Enable {
            key,
            file,
            in_place,
        } => commands::toggle(&key, file.as_deref(), true, in_place)?,
        Commands::Disable {
            key,
            file,
            in_place,
        } => commands::toggle(&key, file.as_deref(), false, in_place)?,
        Commands::Merge {
            base,
            overrides,
            output,
            report,
        } => commands::merge(&base, overrides.as_deref(), output.as_deref(), report)?,
        Commands::Install {
            base,
            overrides,
            profile,
            no_backup,
            force,
        } => {
            let options = ffov::InstallOptions {
                backup: !no_backup,
                force,
            };
            commands::install(
                &base,
                overrides.as_deref(),
                &profile,
                profiles_dir,
                &options,
            )?
        }
        Commands::Profiles => commands::profiles(profiles_dir)?,
        Commands::Explain { key } => commands::explain(&key)?,
    }

    Ok(ExitCode::SUCCESS)
}
