//! Query error types

use thiserror::Error;

/// Query error with classification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct QueryError {
    pub kind: QueryErrorKind,
    pub message: String,
}

impl QueryError {
    pub fn new(kind: QueryErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::Network, message)
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::Status(code), message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::Malformed, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::InvalidRequest, message)
    }
}

/// Error classification. Every kind ends the submission the same way; the
/// distinction only matters for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Connection refused, reset, DNS failure
    Network,
    /// Service answered with a non-2xx status
    Status(u16),
    /// 2xx body that is not JSON or lacks a string `answer`
    Malformed,
    /// The request could not be assembled locally
    InvalidRequest,
}
