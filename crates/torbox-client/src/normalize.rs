//! Mapping from internal call failures to [`TorBoxError`].
//!
//! This is the only place in the workspace that constructs a `TorBoxError`.

use std::fmt::Write;

use torbox_core::{ErrorKind, NULL_DETAIL_ERROR, TorBoxError};

use crate::error::{CallFailure, DecodeReason};

/// Message used when a lookup target of a control call does not exist.
pub const ITEM_NOT_FOUND: &str = "ITEM_NOT_FOUND";

/// Convert a call failure into the error callers see.
#[must_use]
pub fn normalize(failure: CallFailure) -> TorBoxError {
    let error = match failure {
        CallFailure::Transport(transport) => TorBoxError::new(
            ErrorKind::Network,
            transport.message,
            Some(transport.cause.as_str().to_string()),
        ),

        CallFailure::Decode { status, failure } => {
            let mut detail = if failure.attempted.is_empty() {
                match failure.reason {
                    DecodeReason::Syntax => "attempted: json".to_string(),
                    _ => "attempted: none".to_string(),
                }
            } else {
                format!("attempted: {}", failure.attempted.join(", "))
            };
            if !(200..300).contains(&status) {
                let _ = write!(detail, "; status: {status}");
            }
            TorBoxError::new(ErrorKind::Protocol, failure.message, Some(detail))
        }

        CallFailure::MissingData { shape } => TorBoxError::new(
            ErrorKind::Protocol,
            "response carried no data",
            Some(format!("attempted: {shape}")),
        ),

        CallFailure::Rejected { error, detail, .. } => TorBoxError::new(
            ErrorKind::Api,
            non_blank(error).unwrap_or_else(|| NULL_DETAIL_ERROR.to_string()),
            detail,
        ),

        CallFailure::Status {
            status,
            error,
            detail,
        } => TorBoxError::new(
            ErrorKind::Api,
            non_blank(error).unwrap_or_else(|| format!("HTTP_{status}")),
            detail,
        ),

        CallFailure::Unauthenticated { path } => TorBoxError::new(
            ErrorKind::Unauthenticated,
            "no credential is configured for an authenticated call",
            Some(path),
        ),

        CallFailure::NotFound { resource, key } => TorBoxError::new(
            ErrorKind::Api,
            ITEM_NOT_FOUND,
            Some(format!("no {resource} with hash {key}")),
        ),
    };

    tracing::debug!(
        kind = %error.kind(),
        message = %error.message(),
        "call failed"
    );
    error
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
