use reason_ox_common::{CommonRequestError, RetryError, RetryableError};
use thiserror::Error;

/// Categorizes errors for retry logic and handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure or non-2xx status - retried
    Transport,
    /// Well-formed 2xx response without usable content - retried
    EmptyResult,
    /// Retry budget spent - terminal
    Exhausted,
    /// Missing or malformed settings - fail fast, never retried
    Configuration,
    /// Anything else, e.g. a payload that cannot be serialized
    Other,
}

#[derive(Debug, Error)]
pub enum ReasonOxError {
    /// Errors from the HTTP client
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// Non-success status from the API
    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// Unexpected response from the API
    #[error("Unexpected response from API: {0}")]
    UnexpectedResponse(String),

    /// The API answered without any choice content
    #[error("No response received from the API")]
    EmptyResult,

    /// Every attempt allowed by the retry policy failed
    #[error("Giving up after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: usize,
        source: Box<ReasonOxError>,
    },

    /// No API key configured
    #[error("Missing API key")]
    MissingApiKey,

    /// Endpoint is not a valid URL
    #[error("Invalid endpoint URL `{url}`: {source}")]
    InvalidEndpoint {
        url: String,
        source: url::ParseError,
    },

    /// A header name or value is not valid HTTP
    #[error("Invalid header `{name}`: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// JSON serialization errors
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
}

impl ReasonOxError {
    /// Returns the error kind for categorizing errors in retry logic
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(e) if e.is_builder() => ErrorKind::Configuration,
            Self::Http(_) | Self::HttpStatus { .. } | Self::UnexpectedResponse(_) => {
                ErrorKind::Transport
            }
            Self::EmptyResult => ErrorKind::EmptyResult,
            Self::RetriesExhausted { .. } => ErrorKind::Exhausted,
            Self::MissingApiKey | Self::InvalidEndpoint { .. } | Self::InvalidHeader { .. } => {
                ErrorKind::Configuration
            }
            Self::SerdeError(_) => ErrorKind::Other,
        }
    }

    /// Returns true if this error should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport | ErrorKind::EmptyResult)
    }
}

impl RetryableError for ReasonOxError {
    fn is_retryable(&self) -> bool {
        ReasonOxError::is_retryable(self)
    }
}

impl From<CommonRequestError> for ReasonOxError {
    fn from(err: CommonRequestError) -> Self {
        match err {
            CommonRequestError::Http(e) => Self::Http(e),
            CommonRequestError::Json(e) => Self::SerdeError(e),
            CommonRequestError::HttpStatus { status, message } => Self::HttpStatus { status, message },
            CommonRequestError::UnexpectedResponse(body) => Self::UnexpectedResponse(body),
            CommonRequestError::InvalidHeader { name, reason } => Self::InvalidHeader { name, reason },
        }
    }
}

impl From<RetryError<ReasonOxError>> for ReasonOxError {
    fn from(err: RetryError<ReasonOxError>) -> Self {
        match err {
            RetryError::Exhausted { attempts, last } => Self::RetriesExhausted {
                attempts,
                source: Box::new(last),
            },
            RetryError::Permanent(err) => err,
        }
    }
}
