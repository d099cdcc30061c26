use chrono::NaiveDateTime;
use daypulse_types::round_to_tenth;
use std::collections::HashMap;

/// The [start, end] interval spanned by all timestamped events sharing one
/// session id. Invariant: start <= end; a single-event session has
/// start == end and contributes zero duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl SessionWindow {
    pub fn new(at: NaiveDateTime) -> Self {
        SessionWindow { start: at, end: at }
    }

    /// Widen the window to cover another observation. Events arrive in no
    /// particular order, so both bounds can move.
    pub fn widen(&mut self, at: NaiveDateTime) {
        if at < self.start {
            self.start = at;
        }
        if at > self.end {
            self.end = at;
        }
    }

    pub fn duration_secs(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }
}

/// Total minutes across all of a user's session windows, one decimal place.
/// Windows are never merged across session ids, even when they overlap in
/// time.
pub fn total_time_spent_mins(windows: &HashMap<String, SessionWindow>) -> f64 {
    let total_secs: i64 = windows.values().map(SessionWindow::duration_secs).sum();
    round_to_tenth(total_secs as f64 / 60.0)
}
