//! Internal failure types for TorBox calls.
//!
//! These failures are internal to the request path and are mapped to the
//! core [`TorBoxError`](torbox_core::TorBoxError) by the normalizer before a
//! caller sees them.

use std::fmt;

use thiserror::Error;

/// What went wrong below the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportCause {
    /// The request exceeded its deadline.
    Timeout,
    /// No connection could be established.
    Connect,
    /// The caller cancelled the call.
    Cancelled,
    /// The request could not be built or sent.
    Request,
    /// The response body could not be read.
    Body,
    /// The transport itself could not be configured.
    Config,
}

impl TransportCause {
    /// Stable tag used as the normalized error detail.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Cancelled => "cancelled",
            Self::Request => "request",
            Self::Body => "body",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for TransportCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-level failure; never a decoding problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{cause}: {message}")]
pub struct TransportFailure {
    pub cause: TransportCause,
    pub message: String,
}

impl TransportFailure {
    pub fn new(cause: TransportCause, message: impl Into<String>) -> Self {
        Self {
            cause,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn cancelled() -> Self {
        Self::new(TransportCause::Cancelled, "request cancelled by caller")
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(err: reqwest::Error) -> Self {
        let cause = if err.is_timeout() {
            TransportCause::Timeout
        } else if err.is_connect() {
            TransportCause::Connect
        } else if err.is_body() || err.is_decode() {
            TransportCause::Body
        } else if err.is_builder() {
            TransportCause::Config
        } else {
            TransportCause::Request
        };
        // Strip the URL: it may carry a credential in the query string.
        Self::new(cause, err.without_url().to_string())
    }
}

/// Why a response body could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeReason {
    /// The bytes are not JSON at all.
    Syntax,
    /// Valid JSON that is not an envelope, with no fallback accepting it.
    NotEnvelope,
    /// The payload matched neither the expected shape nor any fallback.
    ShapeMismatch,
}

/// Decoding failure, carrying the shapes that were tried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DecodeFailure {
    pub reason: DecodeReason,
    pub attempted: Vec<String>,
    pub message: String,
}

impl DecodeFailure {
    pub fn syntax(message: impl Into<String>) -> Self {
        Self {
            reason: DecodeReason::Syntax,
            attempted: Vec::new(),
            message: message.into(),
        }
    }

    pub fn not_envelope(attempted: Vec<String>) -> Self {
        Self {
            reason: DecodeReason::NotEnvelope,
            attempted,
            message: "response is not a recognizable envelope".to_string(),
        }
    }

    pub fn shape_mismatch(attempted: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            reason: DecodeReason::ShapeMismatch,
            attempted,
            message: message.into(),
        }
    }
}

/// Every way a call can fail before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallFailure {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportFailure),

    #[error("decode failure (status {status}): {failure}")]
    Decode { status: u16, failure: DecodeFailure },

    /// A successful envelope without the payload the call returns.
    #[error("response carried no {shape} payload")]
    MissingData { shape: String },

    /// The service answered with `success: false`.
    #[error("request rejected with status {status}")]
    Rejected {
        status: u16,
        error: Option<String>,
        detail: Option<String>,
    },

    /// Non-2xx status whose body was not a failure envelope.
    #[error("unexpected HTTP status {status}")]
    Status {
        status: u16,
        error: Option<String>,
        detail: Option<String>,
    },

    /// The call needs a credential and none is set.
    #[error("authentication required for {path}")]
    Unauthenticated { path: String },

    /// A lookup that a call depends on found nothing.
    #[error("{resource} '{key}' not found")]
    NotFound { resource: &'static str, key: String },
}
