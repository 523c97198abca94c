//! Failure reporting capability injected into every client.

use crate::outcome::{ErrorKind, Failure};

/// One structured failure log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureRecord {
    pub provider: &'static str,
    pub query: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl FailureRecord {
    pub fn new(provider: &'static str, query: impl Into<String>, failure: &Failure) -> Self {
        Self {
            provider,
            query: query.into(),
            kind: failure.kind(),
            message: failure.message().to_string(),
        }
    }
}

/// Sink for classified client failures.
#[cfg_attr(test, mockall::automock)]
pub trait Reporter: Send + Sync {
    fn failure(&self, record: &FailureRecord);
}

/// Emits each failure as a `tracing` warning with structured fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn failure(&self, record: &FailureRecord) {
        tracing::warn!(
            provider = record.provider,
            query = %record.query,
            kind = %record.kind,
            message = %record.message,
            "integration call failed"
        );
    }
}
