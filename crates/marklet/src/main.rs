//! Marklet CLI - Lightweight markup formatter.
//!
//! Provides commands for:
//! - `render`: Format a file or stdin as HTML
//! - `features`: List the markdown features that can be toggled
//! - `slug`: Print the header id generated for each heading text

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{FeaturesArgs, RenderArgs, SlugArgs};
use output::Output;

/// Marklet - Lightweight markup to HTML formatter.
#[derive(Parser)]
#[command(name = "marklet", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format text as HTML.
    Render(RenderArgs),
    /// List markdown features.
    Features(FeaturesArgs),
    /// Print the header id for each heading text.
    Slug(SlugArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Render(args) if args.verbose);

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Features(args) => args.execute(),
        Commands::Slug(args) => {
            args.execute();
            Ok(())
        }
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
