use daypulse_types::EventRecord;

/// Shared bucket for events carrying neither identifier. One key for all
/// such traffic - identityless devices fold together rather than splitting
/// per device. Known aggregation artifact, kept on purpose.
pub const ANONYMOUS_KEY: &str = "anonymous";

/// Canonical per-event user key: `user_id` if present and non-empty, else
/// `device_id`, else the anonymous sentinel. Total function - never fails.
pub fn resolve_user_key(event: &EventRecord) -> &str {
    if let Some(user_id) = event.user_id.as_deref()
        && !user_id.is_empty()
    {
        return user_id;
    }
    if let Some(device_id) = event.device_id.as_deref()
        && !device_id.is_empty()
    {
        return device_id;
    }
    ANONYMOUS_KEY
}
