//! confsync CLI
//!
//! Command-line access to configuration documents and the sync engine.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} configuration sync", "confsync".green().bold());
            println!();
            println!("Run {} for available commands.", "confsync --help".cyan());
            Ok(())
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` when set
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();

    if verbose {
        tracing::debug!("Verbose mode enabled");
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Get { file, path } => {
            let value = commands::run_get(&file, &path)?;
            println!("{value}");
            Ok(())
        }
        Commands::Set { file, path, value } => commands::run_set(&file, &path, &value),
        Commands::Convert { input, output } => commands::run_convert(&input, &output),
        Commands::Demo { file } => {
            let rendered = commands::run_demo(&file)?;
            print!("{rendered}");
            Ok(())
        }
    }
}
