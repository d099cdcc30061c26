use std::fmt;

/// Result type for daypulse-llm operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while generating the narrative
#[derive(Debug)]
pub enum Error {
    /// Transport-level HTTP failure
    Http(reqwest::Error),

    /// Non-success status from the Messages API
    Status { status: u16, body: String },

    /// API key missing or empty
    MissingApiKey,

    /// Response decoded but did not carry the expected shape
    InvalidResponse(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(err) => write!(f, "HTTP error: {}", err),
            Error::Status { status, body } => {
                write!(f, "Messages API returned status {}: {}", status, body)
            }
            Error::MissingApiKey => write!(f, "ANTHROPIC_API_KEY is missing or empty"),
            Error::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(err) => Some(err),
            Error::Status { .. } | Error::MissingApiKey | Error::InvalidResponse(_) => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}
