//! Command-line interface for abbr-settings
//!
//! Provides `check`, `show` and `schema` subcommands for linting and
//! inspecting settings files.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod check;
mod schema;
mod show;

/// Inspect and lint settings for the markup abbreviation expander
#[derive(Parser)]
#[command(name = "abbr-settings")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an override file against the option schema
    Check(check::CheckArgs),

    /// Print the fully resolved configuration
    Show(show::ShowArgs),

    /// Print the recognized option set with defaults and constraints
    Schema,

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        shell: Shell,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Check(args) => check::run(args),
        Commands::Show(args) => show::run(args),
        Commands::Schema => schema::run(),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}
