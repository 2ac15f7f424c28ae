use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "warpgrid-resctl",
    about = "WarpGrid — inspect and exercise host resource sets",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a host resource config
    Validate {
        /// Path to the host resource TOML file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Replay a placement trace against a host resource config.
    ///
    /// The trace is a JSON array of events:
    /// `{"op": "score" | "consume" | "release", "family": "eni", "task": {...}}`.
    /// Replay stops at the first failed consume.
    Replay {
        /// Path to the host resource TOML file
        #[arg(short, long)]
        config: PathBuf,
        /// Path to the JSON trace
        #[arg(short, long)]
        trace: PathBuf,
        /// Print one JSON object per event instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,warpgrid_resctl=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => commands::validate::validate(&config),
        Commands::Replay { config, trace, json } => commands::replay::replay(&config, &trace, json),
    }
}
