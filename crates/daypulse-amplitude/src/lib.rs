// Upstream producer for the daily pipeline: pulls the raw event batch from
// the Amplitude Export API and hands the engine a Vec of decoded records.
// Everything network-shaped (auth, retry, gzip, lenient line decode) stays
// inside this crate; the engine never sees a transport error.

mod client;
mod decode;
mod error;
mod retry;

pub use client::{ExportClient, ExportConfig};
pub use decode::{decode_export_archive, load_ndjson_file};
pub use error::{Error, Result};
