// Engine module - the one-pass reduction from raw events to the daily report.
// This layer sits between decoded export records (types) and the delivery
// crates. It is pure and synchronous: no I/O, no clock, no failure mode.
// Malformed fields degrade per-field and the pass always completes.

pub mod aggregate;
pub mod identity;
pub mod rates;
pub mod session;
pub mod state;
pub mod taxonomy;

pub use aggregate::Aggregator;
pub use identity::{ANONYMOUS_KEY, resolve_user_key};
pub use rates::percentage;
pub use session::SessionWindow;
pub use state::UserState;
pub use taxonomy::{ReportConfig, Taxonomy};

use daypulse_types::{DailyReport, EventRecord};

// Façade API - stable entry point for the CLI layer.

/// Reduce one day's event batch to a report in a single pass.
pub fn reduce_events(config: &ReportConfig, date: &str, events: &[EventRecord]) -> DailyReport {
    let mut aggregator = Aggregator::new(config);
    for event in events {
        aggregator.observe(event);
    }
    aggregator.finish(date)
}
