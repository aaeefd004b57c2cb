//! guardmine: mine parameter guards from JavaScript functions
//!
//! Finds the simple checks a function performs on its parameters and prints
//! concrete argument values on both sides of every check, ready to paste into
//! generated test calls.
//!
//! ## Example Usage
//!
//! ```bash
//! # List values for every function in a file
//! guardmine mine src/validate.js
//!
//! # Reproduce an earlier run and emit JSON
//! guardmine --json mine src/validate.js --seed 1234
//!
//! # Per-kind counts for one function across several files
//! guardmine mine a.js b.js --function validate --summary
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod guardmine_cli;

use guardmine_cli::mine::MineCmd;

#[derive(Parser)]
#[command(
    name = "guardmine",
    author,
    version,
    about = "Mine parameter guards from JavaScript functions",
    long_about = "Static guard mining for JavaScript.\n\n\
                  Extracts parameter checks from function declarations and \
                  synthesizes boundary values for each of them."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (source expressions and debug logging)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Mine guards and synthesize values for JavaScript files
    Mine(MineCmd),
}

fn main() -> Result<()> {
    let Cli {
        command,
        json,
        verbose,
    } = Cli::parse();
    init_tracing(verbose);

    match command {
        Commands::Mine(cmd) => cmd.execute(json, verbose),
    }
}

/// Logs go to stderr so stdout stays machine readable. `RUST_LOG` wins over
/// the `--verbose` default.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
