//! TorBox client and its per-resource handles.
//!
//! The client owns one [`RequestDispatcher`] and hands out short-lived
//! handles (`torrents()`, `usenet()`, `user()`, `links()`) that borrow it.

mod links;
mod torrents;
mod usenet;
mod user;

use std::sync::Arc;

use torbox_core::{Credential, TorBoxResult};

use crate::config::TorBoxClientConfig;
use crate::credential::CredentialStore;
use crate::dispatcher::RequestDispatcher;
use crate::envelope::Envelope;
use crate::error::CallFailure;
use crate::fallback::shape_name;
use crate::http::{HttpTransport, ReqwestTransport};
use crate::normalize::normalize;
use crate::url::parse_base_url;

pub use links::Links;
pub use torrents::{DEFAULT_PROVIDER, Torrents};
pub use usenet::Usenet;
pub use user::UserApi;

// ============================================================================
// Type Aliases
// ============================================================================

/// Default TorBox client using the reqwest transport.
pub type DefaultTorBoxClient = TorBoxClient<ReqwestTransport>;

// ============================================================================
// Client
// ============================================================================

/// Client for the TorBox API.
///
/// Generic over the HTTP transport so tests can swap in a fake. Use
/// [`DefaultTorBoxClient`] in production code.
pub struct TorBoxClient<B: HttpTransport> {
    dispatcher: RequestDispatcher<B>,
}

impl DefaultTorBoxClient {
    /// Create a client with the given configuration.
    ///
    /// Fails with a `Network` error (detail `config`) when the base URL is
    /// invalid or the HTTP client cannot be built.
    pub fn new(config: &TorBoxClientConfig) -> TorBoxResult<Self> {
        let transport = ReqwestTransport::new(config).map_err(|e| normalize(e.into()))?;
        Self::with_transport(config, transport)
    }

    /// Create a client from `TORBOX_*` environment variables.
    pub fn from_env() -> TorBoxResult<Self> {
        Self::new(&TorBoxClientConfig::from_env())
    }
}

impl<B: HttpTransport> TorBoxClient<B> {
    /// Create a client over a custom transport.
    pub fn with_transport(config: &TorBoxClientConfig, transport: B) -> TorBoxResult<Self> {
        let base_url =
            parse_base_url(&config.normalized_base_url()).map_err(|e| normalize(e.into()))?;
        let credentials = Arc::new(CredentialStore::with_credential(config.credential.clone()));

        Ok(Self {
            dispatcher: RequestDispatcher::new(base_url, transport, credentials),
        })
    }

    /// Authenticate subsequent calls with an API key.
    pub fn use_api_authentication(&self, key: impl Into<String>) {
        self.dispatcher.credentials().set(Credential::api_key(key));
    }

    /// Authenticate subsequent calls with a bearer token.
    pub fn use_bearer_authentication(&self, token: impl Into<String>) {
        self.dispatcher.credentials().set(Credential::bearer(token));
    }

    /// Forget the active credential.
    pub fn clear_authentication(&self) {
        self.dispatcher.credentials().clear();
    }

    /// The shared credential store, for callers that manage auth themselves.
    #[must_use]
    pub const fn credentials(&self) -> &Arc<CredentialStore> {
        self.dispatcher.credentials()
    }

    /// Low-level access for endpoints without a typed wrapper.
    #[must_use]
    pub const fn dispatcher(&self) -> &RequestDispatcher<B> {
        &self.dispatcher
    }

    #[must_use]
    pub const fn torrents(&self) -> Torrents<'_, B> {
        Torrents::new(&self.dispatcher)
    }

    #[must_use]
    pub const fn usenet(&self) -> Usenet<'_, B> {
        Usenet::new(&self.dispatcher)
    }

    #[must_use]
    pub const fn user(&self) -> UserApi<'_, B> {
        UserApi::new(&self.dispatcher)
    }

    #[must_use]
    pub const fn links(&self) -> Links<'_, B> {
        Links::new(&self.dispatcher)
    }
}

/// Payload of a successful envelope that must carry data.
pub(crate) fn require_data<T>(envelope: Envelope<T>) -> Result<T, CallFailure> {
    envelope.data.ok_or_else(|| CallFailure::MissingData {
        shape: shape_name::<T>(),
    })
}
