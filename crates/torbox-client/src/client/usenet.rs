//! Usenet endpoints.

use std::collections::BTreeMap;

use serde::de::IgnoredAny;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use torbox_core::{
    AddUsenetOptions, AvailableUsenet, ControlOperation, TorBoxResult, UsenetAddResult,
    UsenetDownload,
};

use crate::dispatcher::{ApiRequest, RequestDispatcher};
use crate::error::CallFailure;
use crate::fallback::{FallbackCandidate, FallbackChain};
use crate::http::{FilePart, HttpTransport};
use crate::normalize::normalize;
use crate::url::Params;

use super::require_data;

const NZB_FILE_NAME: &str = "usenet.nzb";
const NZB_CONTENT_TYPE: &str = "application/x-nzb";

/// Usenet operations, borrowed from a [`TorBoxClient`](super::TorBoxClient).
pub struct Usenet<'a, B: HttpTransport> {
    dispatcher: &'a RequestDispatcher<B>,
}

impl<'a, B: HttpTransport> Usenet<'a, B> {
    pub(crate) const fn new(dispatcher: &'a RequestDispatcher<B>) -> Self {
        Self { dispatcher }
    }

    /// Usenet downloads on the account.
    pub async fn list(
        &self,
        bypass_cache: bool,
        cancel: &CancellationToken,
    ) -> TorBoxResult<Vec<UsenetDownload>> {
        self.try_list(bypass_cache, cancel).await.map_err(normalize)
    }

    /// Look a download up by hash.
    pub async fn find(
        &self,
        hash: &str,
        bypass_cache: bool,
        cancel: &CancellationToken,
    ) -> TorBoxResult<Option<UsenetDownload>> {
        self.try_find(hash, bypass_cache, cancel)
            .await
            .map_err(normalize)
    }

    /// Upload an NZB file.
    pub async fn add_file(
        &self,
        nzb: Vec<u8>,
        options: &AddUsenetOptions,
        cancel: &CancellationToken,
    ) -> TorBoxResult<UsenetAddResult> {
        let part = FilePart {
            field: "file".to_string(),
            file_name: NZB_FILE_NAME.to_string(),
            content_type: NZB_CONTENT_TYPE.to_string(),
            bytes: nzb,
        };
        let request = ApiRequest::post("usenet/createusenetdownload")
            .multipart(part, &add_fields(options));

        self.dispatcher
            .try_call(&request, &FallbackChain::none(), cancel)
            .await
            .and_then(require_data)
            .map_err(normalize)
    }

    /// Add a download from an NZB link.
    pub async fn add_link(
        &self,
        link: &str,
        options: &AddUsenetOptions,
        cancel: &CancellationToken,
    ) -> TorBoxResult<UsenetAddResult> {
        let mut fields = Params::new().with("link", link);
        for (name, value) in add_fields(options).present() {
            fields.push(name, Some(value));
        }
        let request = ApiRequest::post("usenet/createusenetdownload").form(&fields);

        self.dispatcher
            .try_call(&request, &FallbackChain::none(), cancel)
            .await
            .and_then(require_data)
            .map_err(normalize)
    }

    /// Control the download with `hash`; a missing one fails with
    /// `ITEM_NOT_FOUND`.
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

    /// Cache availability of `hash`, in list or hash-keyed object format.
    pub async fn availability(
        &self,
        hash: &str,
        list_files: bool,
        cancel: &CancellationToken,
    ) -> TorBoxResult<Vec<Option<AvailableUsenet>>> {
        let request = ApiRequest::get("usenet/checkcached").query(
            Params::new()
                .with("hash", hash)
                .with("format", "list")
                .with("list_files", list_files),
        );
        let fallbacks = FallbackChain::none().or(FallbackCandidate::new(
            "hash-keyed map",
            |map: BTreeMap<String, Option<AvailableUsenet>>| map.into_values().collect::<Vec<_>>(),
        ));

        let envelope = self.dispatcher.call(&request, &fallbacks, cancel).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Request a download link for a usenet download, or one of its files.
    pub async fn request_download(
        &self,
        usenet_id: i64,
        file_id: Option<i64>,
        zip: bool,
        cancel: &CancellationToken,
    ) -> TorBoxResult<String> {
        let request = ApiRequest::get("usenet/requestdl")
            .query(
                Params::new()
                    .with("usenet_id", usenet_id)
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
    ) -> Result<Vec<UsenetDownload>, CallFailure> {
        let request = ApiRequest::get("usenet/mylist")
            .query(Params::new().with("bypass_cache", bypass_cache));
        let envelope = self
            .dispatcher
            .try_call(&request, &FallbackChain::none(), cancel)
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    async fn try_find(
        &self,
        hash: &str,
        bypass_cache: bool,
        cancel: &CancellationToken,
    ) -> Result<Option<UsenetDownload>, CallFailure> {
        Ok(self
            .try_list(bypass_cache, cancel)
            .await?
            .into_iter()
            .find(|download| download.hash.eq_ignore_ascii_case(hash)))
    }

    async fn try_control(
        &self,
        hash: &str,
        operation: ControlOperation,
        cancel: &CancellationToken,
    ) -> Result<(), CallFailure> {
        let download = self
            .try_find(hash, true, cancel)
            .await?
            .ok_or_else(|| CallFailure::NotFound {
                resource: "usenet download",
                key: hash.to_string(),
            })?;
        tracing::debug!(hash, id = download.id, %operation, "Controlling usenet download");

        let request = ApiRequest::post("usenet/controlusenetdownload").json(json!({
            "usenet_id": download.id,
            "operation": operation,
        }));
        self.dispatcher
            .try_call(&request, &FallbackChain::<IgnoredAny>::none(), cancel)
            .await?;
        Ok(())
    }
}

fn add_fields(options: &AddUsenetOptions) -> Params {
    Params::new()
        .with("post_processing", options.post_processing.as_param())
        .with_opt("name", options.name.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::client;
    use crate::http::RequestBody;
    use crate::http::testing::{Canned, RecordingTransport};
    use torbox_core::{ErrorKind, PostProcessing};

    fn download_json(id: i64, hash: &str) -> serde_json::Value {
        json!({
            "id": id,
            "hash": hash,
            "name": format!("nzb-{id}"),
            "download_state": "downloading",
            "size": 2048,
        })
    }

    #[tokio::test]
    async fn test_list_and_find() {
        let transport = RecordingTransport::new()
            .then(Canned::ok(&json!({"success": true, "data": [download_json(1, "aaa")]})))
            .then(Canned::ok(&json!({"success": true, "data": [download_json(1, "aaa")]})));
        let client = client(transport);
        let cancel = CancellationToken::new();

        let downloads = client.usenet().list(false, &cancel).await.unwrap();
        assert_eq!(downloads.len(), 1);

        let missing = client.usenet().find("bbb", false, &cancel).await.unwrap();
        assert!(missing.is_none());
        assert_eq!(
            client.dispatcher().transport().last_request().url.path(),
            "/v1/api/usenet/mylist"
        );
    }

    #[tokio::test]
    async fn test_add_file_is_multipart_with_post_processing() {
        let transport = RecordingTransport::new().then(Canned::ok(&json!({
            "success": true,
            "data": {"hash": "aaa", "usenetdownload_id": 11, "auth_id": "u1"}
        })));
        let client = client(transport);
        let options = AddUsenetOptions::new().with_post_processing(PostProcessing::RepairUnpack);

        let added = client
            .usenet()
            .add_file(b"<nzb/>".to_vec(), &options, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(added.usenetdownload_id, Some(11));

        match client.dispatcher().transport().last_request().body {
            RequestBody::Multipart { file, fields } => {
                assert_eq!(file.file_name, "usenet.nzb");
                assert_eq!(file.content_type, "application/x-nzb");
                assert_eq!(fields, vec![("post_processing".to_string(), "2".to_string())]);
            }
            other => panic!("expected multipart body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_add_link_form() {
        let transport = RecordingTransport::new().then(Canned::ok(&json!({
            "success": true,
            "data": {"hash": "aaa", "usenetdownload_id": 12}
        })));
        let client = client(transport);
        let options = AddUsenetOptions::new().with_name("show");

        client
            .usenet()
            .add_link("https://indexer.test/get/1.nzb", &options, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            client.dispatcher().transport().last_request().body,
            RequestBody::Form(vec![
                ("link".to_string(), "https://indexer.test/get/1.nzb".to_string()),
                ("post_processing".to_string(), "-1".to_string()),
                ("name".to_string(), "show".to_string()),
            ])
        );
    }

    #[tokio::test]
    async fn test_control_posts_usenet_id() {
        let transport = RecordingTransport::new()
            .then(Canned::ok(&json!({"success": true, "data": [download_json(4, "aaa")]})))
            .then(Canned::ok(&json!({"success": true})));
        let client = client(transport);

        client
            .usenet()
            .control("AAA", ControlOperation::Delete, &CancellationToken::new())
            .await
            .unwrap();

        let sent = client.dispatcher().transport().last_request();
        assert_eq!(sent.url.path(), "/v1/api/usenet/controlusenetdownload");
        assert_eq!(
            sent.body,
            RequestBody::Json(json!({"usenet_id": 4, "operation": "delete"}))
        );
    }

    #[tokio::test]
    async fn test_control_missing_download() {
        let transport =
            RecordingTransport::new().then(Canned::ok(&json!({"success": true, "data": null})));
        let client = client(transport);

        let err = client
            .usenet()
            .control("aaa", ControlOperation::Pause, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.message(), "ITEM_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_availability_object_format() {
        let transport = RecordingTransport::new().then(Canned::ok(&json!({
            "success": true,
            "data": {
                "bbb": {"name": "other.nzb", "size": 5, "hash": "bbb"},
                "aaa": {"name": "show.nzb", "size": 3, "hash": "aaa"}
            }
        })));
        let client = client(transport);

        let available = client
            .usenet()
            .availability("bbb,aaa", false, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(available.len(), 2);
        assert_eq!(available[0].as_ref().unwrap().name, "show.nzb");
        assert_eq!(available[1].as_ref().unwrap().name, "other.nzb");
    }

    #[tokio::test]
    async fn test_request_download_params() {
        let transport = RecordingTransport::new()
            .then(Canned::ok(&json!({"success": true, "data": "https://dl.test/x"})));
        let client = client(transport);

        let link = client
            .usenet()
            .request_download(4, Some(0), false, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(link, "https://dl.test/x");

        let sent = client.dispatcher().transport().last_request();
        assert_eq!(sent.url.path(), "/v1/api/usenet/requestdl");
        assert_eq!(sent.query_param("usenet_id").as_deref(), Some("4"));
        assert_eq!(sent.query_param("file_id").as_deref(), Some("0"));
        assert_eq!(sent.query_param("token").as_deref(), Some("test-token"));
        assert_eq!(sent.header("Authorization"), Some("Bearer test-token"));
    }
}
