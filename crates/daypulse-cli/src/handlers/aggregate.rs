use anyhow::{Context, Result};
use chrono::NaiveDate;
use daypulse_amplitude::load_ndjson_file;
use daypulse_engine::reduce_events;
use std::path::Path;

use crate::config::Config;
use crate::console;

/// Offline reduction: local NDJSON export in, report JSON on stdout.
pub fn execute(config: &Config, input: &Path, date: NaiveDate) -> Result<()> {
    let events = load_ndjson_file(input)
        .with_context(|| format!("loading events from {}", input.display()))?;
    console::detail(&format!("{} events loaded", events.len()));

    let report = reduce_events(&config.report, &date.format("%Y-%m-%d").to_string(), &events);

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
