//! Torrent endpoints.

use std::collections::{BTreeMap, HashMap};

use serde::de::IgnoredAny;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use torbox_core::{
    AddTorrentOptions, AvailableTorrent, ControlOperation, InstantAvailability, ProviderFiles,
    QueuedTorrent, Torrent, TorBoxResult, TorrentAddResult,
};

use crate::dispatcher::{ApiRequest, RequestDispatcher};
use crate::error::CallFailure;
use crate::fallback::{FallbackCandidate, FallbackChain};
use crate::http::{FilePart, HttpTransport};
use crate::normalize::normalize;
use crate::url::Params;

use super::require_data;

/// Provider key used when the service answers with a flat availability map.
pub const DEFAULT_PROVIDER: &str = "torbox";

const TORRENT_FILE_NAME: &str = "torrent.torrent";
const TORRENT_CONTENT_TYPE: &str = "application/x-bittorrent";

/// Torrent operations, borrowed from a [`TorBoxClient`](super::TorBoxClient).
pub struct Torrents<'a, B: HttpTransport> {
    dispatcher: &'a RequestDispatcher<B>,
}

impl<'a, B: HttpTransport> Torrents<'a, B> {
    pub(crate) const fn new(dispatcher: &'a RequestDispatcher<B>) -> Self {
        Self { dispatcher }
    }

    /// Active torrents. An empty `data` yields an empty list.
    pub async fn list(
        &self,
        bypass_cache: bool,
        cancel: &CancellationToken,
    ) -> TorBoxResult<Vec<Torrent>> {
        self.try_list(bypass_cache, cancel).await.map_err(normalize)
    }

    /// Queued torrents, converted to [`Torrent`] with state `queued`.
    pub async fn queued(&self, cancel: &CancellationToken) -> TorBoxResult<Vec<Torrent>> {
        self.try_queued(cancel).await.map_err(normalize)
    }

    /// Number of active torrents.
    pub async fn total(&self, bypass_cache: bool, cancel: &CancellationToken) -> TorBoxResult<usize> {
        Ok(self.list(bypass_cache, cancel).await?.len())
    }

    /// Look a torrent up by info hash among active, then queued, torrents.
    pub async fn find(
        &self,
        hash: &str,
        bypass_cache: bool,
        cancel: &CancellationToken,
    ) -> TorBoxResult<Option<Torrent>> {
        self.try_find(hash, bypass_cache, cancel)
            .await
            .map_err(normalize)
    }

    /// Upload a `.torrent` file.
    pub async fn add_file(
        &self,
        file: Vec<u8>,
        options: &AddTorrentOptions,
        cancel: &CancellationToken,
    ) -> TorBoxResult<TorrentAddResult> {
        let part = FilePart {
            field: "file".to_string(),
            file_name: TORRENT_FILE_NAME.to_string(),
            content_type: TORRENT_CONTENT_TYPE.to_string(),
            bytes: file,
        };
        let request =
            ApiRequest::post("torrents/createtorrent").multipart(part, &add_fields(options));

        self.dispatcher
            .try_call(&request, &FallbackChain::none(), cancel)
            .await
            .and_then(require_data)
            .map_err(normalize)
    }

    /// Add a torrent from a magnet link.
    pub async fn add_magnet(
        &self,
        magnet: &str,
        options: &AddTorrentOptions,
        cancel: &CancellationToken,
    ) -> TorBoxResult<TorrentAddResult> {
        let mut fields = Params::new().with("magnet", magnet);
        for (name, value) in add_fields(options).present() {
            fields.push(name, Some(value));
        }
        let request = ApiRequest::post("torrents/createtorrent").form(&fields);

        self.dispatcher
            .try_call(&request, &FallbackChain::none(), cancel)
            .await
            .and_then(require_data)
            .map_err(normalize)
    }

    /// Pause, resume, reannounce or delete the torrent with `hash`.
    ///
    /// The hash is resolved with a fresh (uncached) lookup first; a missing
    /// torrent fails with `ITEM_NOT_FOUND`.
    pub async fn control(
        &self,
        hash: &str,
        operation: ControlOperation,
        cancel: &CancellationToken,
    ) -> TorBoxResult<()> {
        self.try_control(hash, operation, cancel)
            .await
            .map_err(normalize)
    }

    /// Cache availability of `hash`.
    ///
    /// Accepts both the list format and the hash-keyed object format.
    pub async fn availability(
        &self,
        hash: &str,
        list_files: bool,
        cancel: &CancellationToken,
    ) -> TorBoxResult<Vec<Option<AvailableTorrent>>> {
        let request = ApiRequest::get("torrents/checkcached").query(
            Params::new()
                .with("hash", hash)
                .with("format", "list")
                .with("list_files", list_files),
        );
        let fallbacks = FallbackChain::none().or(FallbackCandidate::new(
            "hash-keyed map",
            |map: BTreeMap<String, Option<AvailableTorrent>>| map.into_values().collect::<Vec<_>>(),
        ));

        let envelope = self.dispatcher.call(&request, &fallbacks, cancel).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Per-provider file availability of several hashes at once.
    ///
    /// Older responses key files by hash only; those are placed under the
    /// [`DEFAULT_PROVIDER`] key.
    pub async fn instant_availability(
        &self,
        hashes: &[&str],
        cancel: &CancellationToken,
    ) -> TorBoxResult<InstantAvailability> {
        let request = hashes.iter().fold(
            ApiRequest::get("torrents/instantAvailability"),
            |request, hash| request.segment(*hash),
        );
        let fallbacks = FallbackChain::none().or(FallbackCandidate::new(
            "hash-keyed file list",
            |flat: HashMap<String, ProviderFiles>| {
                flat.into_iter()
                    .map(|(hash, files)| (hash, HashMap::from([(DEFAULT_PROVIDER.to_string(), files)])))
                    .collect::<InstantAvailability>()
            },
        ));

        let envelope = self
            .dispatcher
            .call(&request, &fallbacks, cancel)
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Request a download link for a torrent, or one of its files.
    pub async fn request_download(
        &self,
        torrent_id: i64,
        file_id: Option<i64>,
        zip: bool,
        cancel: &CancellationToken,
    ) -> TorBoxResult<String> {
        let request = ApiRequest::get("torrents/requestdl")
            .query(
                Params::new()
                    .with("torrent_id", torrent_id)
                    .with_opt("file_id", file_id)
                    .with("zip", zip),
            )
            .credential_param("token");

        self.dispatcher
            .try_call(&request, &FallbackChain::none(), cancel)
            .await
            .and_then(require_data)
            .map_err(normalize)
    }

    async fn try_list(
        &self,
        bypass_cache: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<Torrent>, CallFailure> {
        let request = ApiRequest::get("torrents/mylist")
            .query(Params::new().with("bypass_cache", bypass_cache));
        let envelope = self
            .dispatcher
            .try_call(&request, &FallbackChain::none(), cancel)
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    async fn try_queued(&self, cancel: &CancellationToken) -> Result<Vec<Torrent>, CallFailure> {
        let envelope = self
            .dispatcher
            .try_call(
                &ApiRequest::get("torrents/getqueued"),
                &FallbackChain::<Vec<QueuedTorrent>>::none(),
                cancel,
            )
            .await?;
        Ok(envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(Torrent::from)
            .collect())
    }

    async fn try_find(
        &self,
        hash: &str,
        bypass_cache: bool,
        cancel: &CancellationToken,
    ) -> Result<Option<Torrent>, CallFailure> {
        let matches = |torrent: &Torrent| torrent.hash.eq_ignore_ascii_case(hash);

        if let Some(torrent) = self
            .try_list(bypass_cache, cancel)
            .await?
            .into_iter()
            .find(matches)
        {
            return Ok(Some(torrent));
        }

        Ok(self.try_queued(cancel).await?.into_iter().find(matches))
    }

    async fn try_control(
        &self,
        hash: &str,
        operation: ControlOperation,
        cancel: &CancellationToken,
    ) -> Result<(), CallFailure> {
        let torrent = self
            .try_find(hash, true, cancel)
            .await?
            .ok_or_else(|| CallFailure::NotFound {
                resource: "torrent",
                key: hash.to_string(),
            })?;

        let path = if torrent.is_queued() {
            "torrents/controlqueued"
        } else {
            "torrents/controltorrent"
        };
        tracing::debug!(hash, id = torrent.id, %operation, path, "Controlling torrent");

        let request = ApiRequest::post(path).json(json!({
            "torrent_id": torrent.id,
            "operation": operation,
        }));
        self.dispatcher
            .try_call(&request, &FallbackChain::<IgnoredAny>::none(), cancel)
            .await?;
        Ok(())
    }
}

fn add_fields(options: &AddTorrentOptions) -> Params {
    Params::new()
        .with("seed", options.seed.as_param())
        .with("allow_zip", options.allow_zip)
        .with_opt("name", options.name.as_deref())
}
