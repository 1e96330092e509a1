use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FailcastError {
    /// A referenced machine or reading does not exist.
    NotFound(String),
    /// The classifier service is unreachable, returned a non-2xx status,
    /// or responded with a payload we could not interpret.
    ServiceUnavailable(String),
    /// Malformed caller input, rejected before any pipeline work.
    Validation(String),
    /// A storage read or write failed.
    Persistence(String),
    /// Invalid or missing configuration.
    Configuration(String),
}

impl fmt::Display for FailcastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailcastError::NotFound(msg) => write!(f, "Not found: {msg}"),
            FailcastError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {msg}"),
            FailcastError::Validation(msg) => write!(f, "Validation error: {msg}"),
            FailcastError::Persistence(msg) => write!(f, "Persistence error: {msg}"),
            FailcastError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for FailcastError {}

impl From<sqlx::Error> for FailcastError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => FailcastError::NotFound(err.to_string()),
            _ => FailcastError::Persistence(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, FailcastError>;
