//! The error type returned across the client boundary.
//!
//! Every failure a caller can observe, whether it started as a dropped
//! connection, an undecodable body or an explicit `success: false` from the
//! service, arrives as a [`TorBoxError`]. Consumers branch on [`ErrorKind`]
//! and never need to look at HTTP status codes or raw JSON.

use std::fmt;

use thiserror::Error;

/// Message used for API failures whose envelope carried no `error` field.
pub const NULL_DETAIL_ERROR: &str = "NULL_DETAIL_ERROR";

/// Failure category of a [`TorBoxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Connectivity problem, timeout or caller cancellation.
    Network,
    /// The response could not be decoded into any accepted shape.
    Protocol,
    /// The service reported the failure itself (`success: false`).
    Api,
    /// The call needs a credential and none is configured.
    Unauthenticated,
}

impl ErrorKind {
    /// Stable lowercase name, suitable for logs and metrics labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Protocol => "protocol",
            Self::Api => "api",
            Self::Unauthenticated => "unauthenticated",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized error returned by every client operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {message}")]
pub struct TorBoxError {
    kind: ErrorKind,
    message: String,
    detail: Option<String>,
}

/// Result type alias for client operations.
pub type TorBoxResult<T> = Result<T, TorBoxError>;

impl TorBoxError {
    /// Build an error from its parts.
    ///
    /// Client code funnels every failure through its normalizer, which is the
    /// only caller of this constructor.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail,
        }
    }

    /// Failure category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable message; never empty for API failures.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Optional extra context (service detail, transport cause, tried shapes).
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// True when the failure was a caller-requested cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Network && self.detail.as_deref() == Some("cancelled")
    }
}
