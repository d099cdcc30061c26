use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};

use crate::args::{Cli, Commands};
use crate::config::Config;
use crate::handlers;

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { date, dry_run } => {
            let date = resolve_date(date.as_deref())?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(handlers::run::execute(&config, date, dry_run))
        }
        Commands::Aggregate { input, date } => {
            let date = resolve_date(date.as_deref())?;
            handlers::aggregate::execute(&config, &input, date)
        }
    }
}

/// Parse `--date` or default to yesterday (UTC) - the day whose export is
/// complete.
fn resolve_date(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{raw}', expected YYYY-MM-DD")),
        None => Utc::now()
            .date_naive()
            .pred_opt()
            .context("date out of range"),
    }
}
