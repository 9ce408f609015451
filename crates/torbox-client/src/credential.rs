//! Shared holder for the active credential.

use std::sync::{Arc, PoisonError, RwLock};

use torbox_core::Credential;

/// Holds the one active [`Credential`].
///
/// Readers get an `Arc` snapshot, so a concurrent [`set`](Self::set) is
/// observed either entirely or not at all.
#[derive(Debug, Default)]
pub struct CredentialStore {
    current: RwLock<Arc<Credential>>,
}

impl CredentialStore {
    /// Store with no credential.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `credential`.
    #[must_use]
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            current: RwLock::new(Arc::new(credential)),
        }
    }

    /// Replace the active credential.
    pub fn set(&self, credential: Credential) {
        let next = Arc::new(credential);
        // The guarded value is a single Arc swap, so a poisoned lock still
        // holds a whole credential.
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// Drop the active credential.
    pub fn clear(&self) {
        self.set(Credential::none());
    }

    /// Snapshot of the active credential, or the "no credential" sentinel.
    #[must_use]
    pub fn current(&self) -> Arc<Credential> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }
}
