//! Account endpoints.

use serde::de::IgnoredAny;
use tokio_util::sync::CancellationToken;
use torbox_core::{TorBoxResult, User};

use crate::dispatcher::{ApiRequest, RequestDispatcher};
use crate::fallback::FallbackChain;
use crate::http::HttpTransport;
use crate::normalize::normalize;
use crate::url::Params;

use super::require_data;

/// Account operations, borrowed from a [`TorBoxClient`](super::TorBoxClient).
pub struct UserApi<'a, B: HttpTransport> {
    dispatcher: &'a RequestDispatcher<B>,
}

impl<'a, B: HttpTransport> UserApi<'a, B> {
    pub(crate) const fn new(dispatcher: &'a RequestDispatcher<B>) -> Self {
        Self { dispatcher }
    }

    /// The authenticated user. `settings` also returns account settings.
    pub async fn me(&self, settings: bool, cancel: &CancellationToken) -> TorBoxResult<User> {
        let request =
            ApiRequest::get("user/me").query(Params::new().with("settings", settings));

        self.dispatcher
            .try_call(&request, &FallbackChain::none(), cancel)
            .await
            .and_then(require_data)
            .map_err(normalize)
    }

    /// Ask the service to email a password-change link to the account.
    pub async fn change_password(&self, cancel: &CancellationToken) -> TorBoxResult<()> {
        self.dispatcher
            .call(
                &ApiRequest::post("settings/changePassword"),
                &FallbackChain::<IgnoredAny>::none(),
                cancel,
            )
            .await?;
        Ok(())
    }
}
