use std::fmt;

/// Result type for daypulse-mailer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while delivering the report email
#[derive(Debug)]
pub enum Error {
    /// Transport-level HTTP failure
    Http(reqwest::Error),

    /// Non-success status from the mail API
    Status { status: u16, body: String },

    /// Sender, recipients or API key missing
    MissingConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(err) => write!(f, "HTTP error: {}", err),
            Error::Status { status, body } => {
                write!(f, "Mail API returned status {}: {}", status, body)
            }
            Error::MissingConfig(msg) => write!(f, "Mailer misconfigured: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(err) => Some(err),
            Error::Status { .. } | Error::MissingConfig(_) => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}
