use std::fmt;

use super::model::{Action, TravelerId, TripId, TripStatus};
use crate::outcome::{ErrorPayload, Failure};

/// Errors surfaced by the trip service.
#[derive(Debug, Clone, PartialEq)]
pub enum TripError {
    TravelerNotFound(TravelerId),
    TripNotFound(TripId),
    Validation {
        field: &'static str,
        message: String,
    },
    DuplicateEmail(String),
    InvalidTransition {
        from: TripStatus,
        action: Action,
    },
    Forbidden(String),
    /// An external lookup failed. Trip state is untouched.
    Integration(Failure),
}

impl TripError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        TripError::Validation {
            field,
            message: message.into(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            TripError::TravelerNotFound(_) | TripError::TripNotFound(_) => "not_found",
            TripError::Validation { .. } => "validation",
            TripError::DuplicateEmail(_) => "conflict",
            TripError::InvalidTransition { .. } => "invalid_transition",
            TripError::Forbidden(_) => "forbidden",
            TripError::Integration(failure) => failure.kind().as_str(),
        }
    }

    /// User-facing `{kind, message}` payload.
    pub fn payload(&self) -> ErrorPayload {
        match self {
            TripError::Integration(failure) => failure.payload(),
            other => ErrorPayload {
                kind: other.kind().to_string(),
                message: other.to_string(),
            },
        }
    }
}

impl fmt::Display for TripError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripError::TravelerNotFound(id) => write!(f, "Traveler {} not found", id),
            TripError::TripNotFound(id) => write!(f, "Trip {} not found", id),
            TripError::Validation { field, message } => write!(f, "{}: {}", field, message),
            TripError::DuplicateEmail(email) => {
                write!(f, "A traveler with email {} already exists", email)
            }
            TripError::InvalidTransition { from, action } => {
                write!(f, "Cannot {} a trip that is {}", action, from)
            }
            TripError::Forbidden(msg) => write!(f, "Permission denied: {}", msg),
            TripError::Integration(failure) => write!(f, "External lookup failed: {}", failure),
        }
    }
}

impl std::error::Error for TripError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TripError::Integration(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<Failure> for TripError {
    fn from(failure: Failure) -> Self {
        TripError::Integration(failure)
    }
}
