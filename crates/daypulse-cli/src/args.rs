use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "daypulse")]
#[command(about = "Pull, reduce and deliver the daily product-analytics report", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file path. Falls back to $DAYPULSE_CONFIG, then the platform
    /// config directory, then built-in defaults.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: fetch, aggregate, narrate, email
    Run {
        /// Day to report on, YYYY-MM-DD. Defaults to yesterday (UTC).
        #[arg(long)]
        date: Option<String>,

        /// Print the report and the rendered email instead of calling the
        /// analyzer or delivering anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Reduce a local NDJSON export to a report, printed as JSON
    Aggregate {
        /// Path to an NDJSON (optionally .gz) export file
        #[arg(long)]
        input: PathBuf,

        /// Day label for the report, YYYY-MM-DD. Defaults to yesterday (UTC).
        #[arg(long)]
        date: Option<String>,
    },
}
