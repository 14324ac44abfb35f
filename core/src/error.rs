use std::fmt;

use http::StatusCode;
use thiserror::Error;

/// The error type for kraken-rest operations
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: Option<StatusCode>,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration error (malformed secret, unsupported content type, invalid base url)
    ConfigInvalid,

    /// Credentials are missing or invalid for a private endpoint
    CredentialInvalid,

    /// Request cannot be signed or built (duplicate nonce, invalid uri, etc.)
    RequestInvalid,

    /// The cancellation token fired before or during the call
    Cancelled,

    /// DNS, connection or I/O failure while talking to the remote host
    Transport,

    /// The remote answered with a status code other than `200 OK`
    Status,

    /// The response carried an unsupported content type
    ContentType,

    /// The response body did not match the expected shape
    Decode,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message without the kind prefix
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the http status code carried by a [`ErrorKind::Status`] error.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Check if this error was raised before or during transport, as opposed
    /// to a problem with the response the remote returned.
    pub fn is_transport_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport | ErrorKind::Cancelled)
    }
}

// Convenience constructors
impl Error {
    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a credential invalid error
    pub fn credential_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialInvalid, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create a cancelled error
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cancelled, message)
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create a status error carrying the unexpected status code
    pub fn status_error(status: StatusCode, message: impl Into<String>) -> Self {
        let mut err = Self::new(ErrorKind::Status, message);
        err.status = Some(status);
        err
    }

    /// Create a content type error
    pub fn content_type(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ContentType, message)
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::CredentialInvalid => write!(f, "invalid credentials"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::Cancelled => write!(f, "cancelled"),
            ErrorKind::Transport => write!(f, "transport failure"),
            ErrorKind::Status => write!(f, "unexpected status"),
            ErrorKind::ContentType => write!(f, "unsupported content type"),
            ErrorKind::Decode => write!(f, "decode failure"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::ToStrError> for Error {
    fn from(err: http::header::ToStrError) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
