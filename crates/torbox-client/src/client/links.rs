//! Hoster link endpoints.

use tokio_util::sync::CancellationToken;
use torbox_core::TorBoxResult;

use crate::dispatcher::{ApiRequest, RequestDispatcher};
use crate::fallback::{FallbackCandidate, FallbackChain};
use crate::http::HttpTransport;
use crate::url::Params;

/// Link operations, borrowed from a [`TorBoxClient`](super::TorBoxClient).
pub struct Links<'a, B: HttpTransport> {
    dispatcher: &'a RequestDispatcher<B>,
}

impl<'a, B: HttpTransport> Links<'a, B> {
    pub(crate) const fn new(dispatcher: &'a RequestDispatcher<B>) -> Self {
        Self { dispatcher }
    }

    /// Links contained in a hoster folder; empty when none were found.
    pub async fn folder(&self, link: &str, cancel: &CancellationToken) -> TorBoxResult<Vec<String>> {
        self.post_link("unrestrict/folder", link, cancel).await
    }

    /// Links contained in a remote container file (RSDF, CCF, DLC).
    pub async fn container_link(
        &self,
        link: &str,
        cancel: &CancellationToken,
    ) -> TorBoxResult<Vec<String>> {
        self.post_link("unrestrict/containerLink", link, cancel)
            .await
    }

    async fn post_link(
        &self,
        path: &str,
        link: &str,
        cancel: &CancellationToken,
    ) -> TorBoxResult<Vec<String>> {
        let request = ApiRequest::post(path).form(&Params::new().with("link", link));
        // These endpoints may answer with a bare JSON array.
        let fallbacks =
            FallbackChain::none().or(FallbackCandidate::new("bare list", |links: Vec<String>| links));

        let envelope = self.dispatcher.call(&request, &fallbacks, cancel).await?;
        Ok(envelope.data.unwrap_or_default())
    }
}
