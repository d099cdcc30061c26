use chrono::NaiveDateTime;

/// The two textual timestamp formats the export emits, tried in order.
const EVENT_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// Parse an export timestamp. Returns None for anything that matches
/// neither format - callers degrade per-field rather than dropping the
/// event.
pub fn parse_event_time(raw: &str) -> Option<NaiveDateTime> {
    EVENT_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Round to one decimal place, the precision every duration in the report
/// is stated at.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
