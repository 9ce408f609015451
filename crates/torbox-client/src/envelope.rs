//! The decoded response envelope.

/// Canonical shape of every decoded response.
///
/// When `success` is `Some(false)`, `data` is always `None`, whatever the
/// service put under the `data` key.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub success: Option<bool>,
    pub error: Option<String>,
    pub detail: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Envelope for a response that carried the payload without a wrapper.
    pub(crate) const fn bare(data: T) -> Self {
        Self {
            success: None,
            error: None,
            detail: None,
            data: Some(data),
        }
    }

    /// True when the service explicitly reported failure.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self.success, Some(false))
    }

    #[must_use]
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}
