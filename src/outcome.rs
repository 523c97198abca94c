//! Classified outcome of a single integration call.
//!
//! Every client call returns an [`Outcome`]: either the projected result or a
//! [`Failure`] tagged with an [`ErrorKind`]. Raw transport and parse errors
//! never cross this boundary.

use serde::Serialize;
use std::fmt;

/// Result of one integration call.
pub type Outcome<T> = std::result::Result<T, Failure>;

/// Classification of an integration failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No response within the configured timeout.
    Timeout,
    /// Connection could not be established or was dropped.
    Unavailable,
    /// HTTP 5xx.
    ServerError,
    /// HTTP 4xx.
    ClientError,
    /// Response arrived but the expected fields are absent or unreadable.
    NotFoundOrMalformed,
    /// The retry policy gave up. See [`Failure::underlying`].
    RetriesExhausted,
}

impl ErrorKind {
    /// Whether a repeated attempt has a reasonable chance of succeeding.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::Timeout | ErrorKind::Unavailable | ErrorKind::ServerError
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::ServerError => "server_error",
            ErrorKind::ClientError => "client_error",
            ErrorKind::NotFoundOrMalformed => "not_found_or_malformed",
            ErrorKind::RetriesExhausted => "retries_exhausted",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified integration failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
    underlying: Option<ErrorKind>,
}

impl Failure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            underlying: None,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFoundOrMalformed, message)
    }

    /// Builds a failure from a non-success HTTP status.
    /// 5xx maps to [`ErrorKind::ServerError`], everything else to [`ErrorKind::ClientError`].
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = if (500..=599).contains(&status) {
            ErrorKind::ServerError
        } else {
            ErrorKind::ClientError
        };
        Self {
            status: Some(status),
            ..Self::new(kind, message)
        }
    }

    /// Wraps the last failure seen by the retry policy.
    pub fn retries_exhausted(last: Failure, attempts: u32) -> Self {
        Self {
            kind: ErrorKind::RetriesExhausted,
            message: format!("gave up after {} attempt(s): {}", attempts, last.message),
            status: last.status,
            underlying: Some(last.kind),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status of the response, when one was received.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Kind of the last attempt's failure for [`ErrorKind::RetriesExhausted`].
    pub fn underlying(&self) -> Option<ErrorKind> {
        self.underlying
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// User-facing `{kind, message}` payload.
    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            kind: self.kind.as_str().to_string(),
            message: self.message.clone(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.underlying {
            Some(last) => write!(f, "{} ({}): {}", self.kind, last, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for Failure {}

/// Structured error body shown to users instead of a backtrace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub kind: String,
    pub message: String,
}
