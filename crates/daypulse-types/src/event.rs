use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// NOTE: Schema Design Goals
//
// 1. Leniency: Export rows are loosely typed and vary by SDK version.
//    Every field defaults, unknown fields are ignored, and nothing here
//    rejects a row - a record that decodes at all is a record we count.
//
// 2. Read-only: The engine consumes records as handed over by the export
//    layer and never writes them back. No uniqueness or ordering is assumed
//    across a batch.

/// One raw analytics event as it appears in the daily export (NDJSON row).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRecord {
    /// Identified user, when the SDK had one at event time.
    #[serde(default)]
    pub user_id: Option<String>,

    /// Device identifier, present for anonymous traffic.
    #[serde(default)]
    pub device_id: Option<String>,

    /// Raw event-type string, exactly as the client emitted it.
    #[serde(default)]
    pub event_type: String,

    /// Opaque client session identifier. Absent for some server-side events.
    #[serde(default, deserialize_with = "session_id_lenient")]
    pub session_id: Option<String>,

    /// Textual timestamp, `YYYY-MM-DD HH:MM:SS` with optional fraction.
    #[serde(default)]
    pub event_time: String,

    /// Free-form event properties.
    #[serde(default)]
    pub event_properties: Option<Map<String, Value>>,
}

impl EventRecord {
    /// Look up a scalar event property as a string, if present and non-empty.
    pub fn property_str(&self, name: &str) -> Option<&str> {
        self.event_properties
            .as_ref()
            .and_then(|props| props.get(name))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Amplitude emits session ids as numbers in some SDKs and strings in
/// others; accept both and carry the textual form.
fn session_id_lenient<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_minimal_record() {
        let record: EventRecord = serde_json::from_str(r#"{"event_type":"app_open"}"#).unwrap();
        assert_eq!(record.event_type, "app_open");
        assert!(record.user_id.is_none());
        assert!(record.session_id.is_none());
        assert_eq!(record.event_time, "");
    }

    #[test]
    fn test_decode_numeric_session_id() {
        let record: EventRecord =
            serde_json::from_str(r#"{"event_type":"e","session_id":1741000000000}"#).unwrap();
        assert_eq!(record.session_id.as_deref(), Some("1741000000000"));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let record: EventRecord = serde_json::from_str(
            r#"{"event_type":"e","amplitude_id":42,"platform":"iOS","city":"Oakland"}"#,
        )
        .unwrap();
        assert_eq!(record.event_type, "e");
    }

    #[test]
    fn test_property_str() {
        let record: EventRecord = serde_json::from_str(
            r#"{"event_type":"e","event_properties":{"screen_name":"home","count":3,"empty":""}}"#,
        )
        .unwrap();
        assert_eq!(record.property_str("screen_name"), Some("home"));
        assert_eq!(record.property_str("count"), None);
        assert_eq!(record.property_str("empty"), None);
        assert_eq!(record.property_str("missing"), None);
    }
}
