//! Multisite CLI - site definition resolution.
//!
//! Provides commands for:
//! - `sites`: List the servable site definitions
//! - `resolve`: Find the site that owns a content item

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ResolveArgs, SitesArgs};
use output::Output;

/// Multisite - site definition resolution.
#[derive(Parser, Debug)]
#[command(name = "multisite", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the servable site definitions.
    Sites(SitesArgs),
    /// Find the site that owns a content item.
    Resolve(ResolveArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Sites(args) => args.shared.verbose,
            Self::Resolve(args) => args.shared.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Sites(args) => args.execute(),
        Commands::Resolve(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
