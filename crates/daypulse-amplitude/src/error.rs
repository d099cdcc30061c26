use std::fmt;

/// Result type for daypulse-amplitude operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while fetching or decoding the export
#[derive(Debug)]
pub enum Error {
    /// Transport-level HTTP failure
    Http(reqwest::Error),

    /// Non-success status from the export endpoint
    Status { status: u16, body: String },

    /// IO failure while reading or decompressing the archive
    Io(std::io::Error),

    /// API credentials missing or empty
    MissingCredentials(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(err) => write!(f, "HTTP error: {}", err),
            Error::Status { status, body } => {
                write!(f, "Export API returned status {}: {}", status, body)
            }
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::MissingCredentials(msg) => write!(f, "Missing credentials: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Status { .. } | Error::MissingCredentials(_) => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
