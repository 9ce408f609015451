//! Request dispatch: credential injection, one round trip, decoding.
//!
//! Design principles:
//! - One network round trip per call, never retried here
//! - Cancellation is handled via `tokio::select!` around the transport call
//! - A call that needs a credential fails before the transport is touched
//!   when none is set

use std::sync::Arc;

use serde::de::{DeserializeOwned, IgnoredAny};
use tokio_util::sync::CancellationToken;
use torbox_core::{AuthMode, TorBoxResult};
use url::Url;

use crate::credential::CredentialStore;
use crate::decoder::{decode, error_fields};
use crate::envelope::Envelope;
use crate::error::{CallFailure, DecodeReason, TransportFailure};
use crate::fallback::FallbackChain;
use crate::http::{FilePart, HttpMethod, HttpTransport, RawRequest, RawResponse, RequestBody};
use crate::normalize::normalize;
use crate::url::{Params, build_url};

/// Field name an API key is injected under unless a call names another.
pub const DEFAULT_CREDENTIAL_PARAM: &str = "token";

// ============================================================================
// Call Descriptor
// ============================================================================

/// Everything the dispatcher needs to perform one call.
///
/// Calls require a credential unless built with
/// [`anonymous`](Self::anonymous).
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: HttpMethod,
    path: String,
    segments: Vec<String>,
    query: Params,
    body: RequestBody,
    requires_auth: bool,
    credential_param: Option<&'static str>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            segments: Vec::new(),
            query: Params::new(),
            body: RequestBody::Empty,
            requires_auth: true,
            credential_param: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Append a caller-supplied path segment; it is percent-encoded so it
    /// can never alter the rest of the URL.
    #[must_use]
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Replace the query parameters.
    #[must_use]
    pub fn query(mut self, query: Params) -> Self {
        self.query = query;
        self
    }

    /// URL-form-encoded body; absent values are omitted.
    #[must_use]
    pub fn form(mut self, fields: &Params) -> Self {
        self.body = RequestBody::Form(fields.to_pairs());
        self
    }

    #[must_use]
    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    /// Multipart body with one file part and string parts.
    #[must_use]
    pub fn multipart(mut self, file: FilePart, fields: &Params) -> Self {
        self.body = RequestBody::Multipart {
            file,
            fields: fields.to_pairs(),
        };
        self
    }

    /// Send without a credential.
    #[must_use]
    pub const fn anonymous(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    /// Also carry the credential value under `name` (query or form field).
    #[must_use]
    pub const fn credential_param(mut self, name: &'static str) -> Self {
        self.credential_param = Some(name);
        self
    }

    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        self.requires_auth
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Sends [`ApiRequest`]s through a transport and decodes the answers.
pub struct RequestDispatcher<B: HttpTransport> {
    base_url: Url,
    transport: B,
    credentials: Arc<CredentialStore>,
}

impl<B: HttpTransport> RequestDispatcher<B> {
    pub const fn new(base_url: Url, transport: B, credentials: Arc<CredentialStore>) -> Self {
        Self {
            base_url,
            transport,
            credentials,
        }
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub const fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    #[must_use]
    pub const fn transport(&self) -> &B {
        &self.transport
    }

    /// Perform one round trip and return the raw response, whatever its
    /// status.
    pub async fn execute(
        &self,
        request: &ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<RawResponse, CallFailure> {
        let raw = self.prepare(request)?;

        if cancel.is_cancelled() {
            return Err(TransportFailure::cancelled().into());
        }

        tracing::debug!(method = %request.method, path = %request.path, "Sending TorBox request");

        let response = tokio::select! {
            biased;

            () = cancel.cancelled() => Err(TransportFailure::cancelled()),

            result = self.transport.send(raw) => result,
        }?;

        tracing::debug!(
            path = %request.path,
            status = response.status,
            bytes = response.body.len(),
            "TorBox response received"
        );
        Ok(response)
    }

    /// Perform the call and decode the envelope, normalizing any failure.
    ///
    /// `fallbacks` lists alternate payload shapes accepted when the primary
    /// shape `T` does not match.
    pub async fn call<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        fallbacks: &FallbackChain<T>,
        cancel: &CancellationToken,
    ) -> TorBoxResult<Envelope<T>> {
        self.try_call(request, fallbacks, cancel)
            .await
            .map_err(normalize)
    }

    /// Same as [`call`](Self::call) without normalizing the failure.
    pub(crate) async fn try_call<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        fallbacks: &FallbackChain<T>,
        cancel: &CancellationToken,
    ) -> Result<Envelope<T>, CallFailure> {
        let response = self.execute(request, cancel).await?;

        if !response.is_success() {
            return Err(status_failure(&response));
        }

        let envelope = decode(&response.body, fallbacks).map_err(|failure| CallFailure::Decode {
            status: response.status,
            failure,
        })?;

        if envelope.is_failure() {
            return Err(CallFailure::Rejected {
                status: response.status,
                error: envelope.error,
                detail: envelope.detail,
            });
        }

        Ok(envelope)
    }

    fn prepare(&self, request: &ApiRequest) -> Result<RawRequest, CallFailure> {
        let mut query = request.query.clone();
        let mut body = request.body.clone();
        let mut headers = Vec::new();

        if request.requires_auth {
            let credential = self.credentials.current();
            if !credential.is_present() {
                return Err(CallFailure::Unauthenticated {
                    path: request.path.clone(),
                });
            }

            match credential.mode() {
                AuthMode::BearerToken => {
                    headers.push((
                        "Authorization".to_string(),
                        format!("Bearer {}", credential.value()),
                    ));
                    if let Some(name) = request.credential_param {
                        query.push(name, Some(credential.value()));
                    }
                }
                AuthMode::ApiKey => {
                    let name = request
                        .credential_param
                        .unwrap_or(DEFAULT_CREDENTIAL_PARAM);
                    let value = credential.value().to_string();
                    match &mut body {
                        RequestBody::Form(fields) | RequestBody::Multipart { fields, .. } => {
                            fields.push((name.to_string(), value));
                        }
                        RequestBody::Empty | RequestBody::Json(_) => {
                            query.push(name, Some(value));
                        }
                    }
                }
                AuthMode::None => {}
            }
        }

        let url = build_url(&self.base_url, &request.path, &request.segments, &query)?;
        Ok(RawRequest {
            method: request.method,
            url,
            headers,
            body,
        })
    }
}

/// Failure for a non-2xx response. The body is only read as an envelope so
/// a payload shape mismatch on an error page is never reported.
fn status_failure(response: &RawResponse) -> CallFailure {
    match decode::<IgnoredAny>(&response.body, &FallbackChain::none()) {
        Ok(envelope) if envelope.is_failure() => CallFailure::Rejected {
            status: response.status,
            error: envelope.error,
            detail: envelope.detail,
        },
        Ok(envelope) => CallFailure::Status {
            status: response.status,
            error: envelope.error,
            detail: envelope.detail,
        },
        Err(failure) if failure.reason == DecodeReason::Syntax => CallFailure::Decode {
            status: response.status,
            failure,
        },
        Err(_) => {
            let (error, detail) = error_fields(&response.body);
            CallFailure::Status {
                status: response.status,
                error,
                detail,
            }
        }
    }
}
