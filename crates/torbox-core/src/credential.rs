//! Authentication material sent with authenticated calls.

use std::fmt;

/// How a credential is presented to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMode {
    /// Injected as a query (or form) field on calls that need it.
    ApiKey,
    /// Sent as `Authorization: Bearer <token>`.
    BearerToken,
    /// No credential configured.
    None,
}

/// A single credential. Replaced wholesale, never edited in place.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    mode: AuthMode,
    value: String,
}

impl Credential {
    /// API key credential.
    pub fn api_key(value: impl Into<String>) -> Self {
        Self {
            mode: AuthMode::ApiKey,
            value: value.into(),
        }
    }

    /// Bearer token credential.
    pub fn bearer(value: impl Into<String>) -> Self {
        Self {
            mode: AuthMode::BearerToken,
            value: value.into(),
        }
    }

    /// The "no credential" sentinel.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            mode: AuthMode::None,
            value: String::new(),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> AuthMode {
        self.mode
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// True when the credential can authenticate a request.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.mode != AuthMode::None && !self.value.trim().is_empty()
    }
}

impl Default for Credential {
    fn default() -> Self {
        Self::none()
    }
}

// Keep secrets out of logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("mode", &self.mode)
            .field("value", &"<redacted>")
            .finish()
    }
}
