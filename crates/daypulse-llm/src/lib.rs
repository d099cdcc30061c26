// Downstream consumer of the daily report: asks the Anthropic Messages API
// for a three-section narrative. Failures here degrade - the pipeline falls
// back to Analysis::unavailable() and the report email still goes out, so
// the client makes a single attempt rather than retrying.

mod client;
mod error;
mod prompt;
mod sections;

pub use client::{AnalyzerClient, AnalyzerConfig};
pub use error::{Error, Result};
pub use prompt::build_prompt;
pub use sections::parse_sections;
