//! epcis-hash - compute and verify content-derived EPCIS event identifiers.

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod input;
mod output;

use commands::{canonicalize, hash, verify};

#[derive(Parser)]
#[command(name = "epcis-hash")]
#[command(about = "Content-derived hash identifiers for EPCIS events")]
struct Cli {
    /// Log filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Args)]
pub struct Source {
    /// EPCIS JSON document, event, or event array (stdin if not provided)
    input: Option<String>,
    /// TOML file with cbv_version and namespace bindings
    #[arg(long)]
    config: Option<String>,
    /// Override the configured CBV version (e.g. CBV2.0)
    #[arg(long)]
    cbv_version: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the hash identifier of every event
    Hash {
        #[command(flatten)]
        source: Source,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the canonical token stream and report of every event
    Canonicalize {
        #[command(flatten)]
        source: Source,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check claimed eventIDs against recomputed identifiers
    Verify {
        #[command(flatten)]
        source: Source,
        /// Exit with error code if any event does not verify
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.command {
        Commands::Hash { source, json } => hash::run(&source, json),
        Commands::Canonicalize { source, json } => canonicalize::run(&source, json),
        Commands::Verify {
            source,
            strict,
            json,
        } => verify::run(&source, strict, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
