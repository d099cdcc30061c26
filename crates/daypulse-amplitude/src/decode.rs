use daypulse_types::EventRecord;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::Result;

/// Decode an export response body: one or more concatenated gzip members,
/// each holding NDJSON. Blank and malformed lines are skipped - a single
/// bad row never fails the batch.
pub fn decode_export_archive(bytes: &[u8]) -> Result<Vec<EventRecord>> {
    decode_lines(BufReader::new(MultiGzDecoder::new(bytes)))
}

/// Load records from a local export file, for backfill and offline runs.
/// `.gz` files go through the archive path; anything else is read as plain
/// NDJSON.
pub fn load_ndjson_file(path: &Path) -> Result<Vec<EventRecord>> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        decode_lines(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        decode_lines(BufReader::new(file))
    }
}

fn decode_lines<R: BufRead>(reader: R) -> Result<Vec<EventRecord>> {
    let mut events = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<EventRecord>(line) {
            Ok(event) => events.push(event),
            Err(_) => continue, // Skip malformed lines
        }
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    const SAMPLE: &str = concat!(
        r#"{"user_id":"u1","event_type":"signup_completed","event_time":"2025-03-15 10:00:00"}"#,
        "\n",
        "\n",
        "this is not json\n",
        r#"{"user_id":"u2","event_type":"app_open","event_time":"2025-03-15 11:00:00"}"#,
        "\n",
    );

    fn gzip(data: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_decode_skips_blank_and_malformed_lines() {
        let events = decode_export_archive(&gzip(SAMPLE)).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].user_id.as_deref(), Some("u1"));
        assert_eq!(events[1].event_type, "app_open");
    }

    #[test]
    fn test_decode_handles_multiple_gzip_members() {
        let mut bytes = gzip(r#"{"event_type":"a"}"#);
        bytes.extend(gzip("\n{\"event_type\":\"b\"}\n"));
        let events = decode_export_archive(&bytes).unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_load_plain_ndjson_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        std::fs::write(&path, SAMPLE).unwrap();

        let events = load_ndjson_file(&path).unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_load_gzipped_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson.gz");
        std::fs::write(&path, gzip(SAMPLE)).unwrap();

        let events = load_ndjson_file(&path).unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_ndjson_file(Path::new("/nonexistent/events.ndjson"));
        assert!(result.is_err());
    }
}
