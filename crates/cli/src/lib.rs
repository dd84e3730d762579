//! # ERD CLI
//!
//! Command-line front end for ERD Studio.
//!
//! The diagram lives in a storage directory holding one JSON document per
//! storage key. Each invocation loads it, applies one command, and saves it.
//!
//! ## Commands
//!
//! - `init` - Create empty collections
//! - `entity add|move|rename|delete` - Entity operations
//! - `attribute add|remove` - Attribute operations
//! - `relationship add|update|delete` - Relationship operations
//! - `list` - Show the diagram
//! - `validate` - Report consistency problems
//! - `export` / `import` - Snapshot files
//!

pub mod commands;
pub mod config;
pub mod output;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub use commands::Commands;
pub use config::CliConfig;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, Parser)]
#[command(name = "erd", version)]
#[command(about = "ERD Studio - Entity-relationship diagram editor", long_about = None)]
pub struct Cli {
    /// Config file (defaults to ./erd.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage directory, overriding the config file
    #[arg(long, global = true, env = "ERD_STORAGE_DIR")]
    pub storage_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_err() {
        // an embedding host already owns the global subscriber
        tracing::debug!("Log subscriber already installed, keeping it");
    }
}

/// Parse arguments and execute the command
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run_with(cli)
}

/// Execute already parsed arguments
pub fn run_with(cli: Cli) -> Result<()> {
    let config = CliConfig::load(cli.config.as_deref(), cli.storage_dir)
        .context("Failed to load configuration")?;
    commands::execute(cli.command, &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_negative_coordinates() {
        let cli = Cli::try_parse_from(["erd", "entity", "move", "Client", "-20", "-5.5"]).unwrap();
        match cli.command {
            Commands::Entity(commands::EntityCommand::Move { entity, x, y }) => {
                assert_eq!(entity, "Client");
                assert_eq!(x, -20.0);
                assert_eq!(y, -5.5);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_verbosity_count() {
        let cli = Cli::try_parse_from(["erd", "-vv", "list"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging(0);
        init_logging(2);
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
