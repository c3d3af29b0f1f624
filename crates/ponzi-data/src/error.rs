//! Error types for the market data client.

use ponzi_core::ModelError;
use thiserror::Error;

/// Result type alias for data client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the data client.
#[derive(Error, Debug)]
pub enum Error {
    /// Network failure or non-success HTTP status.
    #[error("transport error: {0}")]
    Transport(String),
    /// The provider answered with something we could not interpret.
    #[error("decode error in {context}: {message}")]
    Decode { context: String, message: String },
    /// The provider asked us to slow down. Retriable.
    #[error("throttled by provider: {0}")]
    Throttled(String),
    /// Caller passed an unusable argument.
    #[error("bad input: {0}")]
    BadInput(String),
    /// On-disk cache could not be written.
    #[error("cache error: {0}")]
    Cache(#[from] std::io::Error),
}

impl Error {
    pub fn decode(context: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Error::Decode {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Whether the same request may succeed if retried later.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Error::Throttled(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

impl From<ModelError> for Error {
    fn from(err: ModelError) -> Self {
        Error::BadInput(err.to_string())
    }
}
