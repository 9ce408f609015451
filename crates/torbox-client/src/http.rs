//! HTTP transport abstraction for the TorBox API.
//!
//! The dispatcher talks to a [`HttpTransport`], which performs exactly one
//! round trip per call and never retries. The production implementation uses
//! reqwest; tests swap in a recording fake or a mock.

use std::fmt;

use async_trait::async_trait;
use url::Url;

use crate::config::TorBoxClientConfig;
use crate::error::{TransportCause, TransportFailure};

// ============================================================================
// Request / Response Types
// ============================================================================

/// HTTP methods used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary part of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Request body encodings.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    /// `application/x-www-form-urlencoded` pairs
    Form(Vec<(String, String)>),
    /// Raw JSON document
    Json(serde_json::Value),
    /// One file part plus string parts
    Multipart {
        file: FilePart,
        fields: Vec<(String, String)>,
    },
}

/// A fully built request, ready for the wire.
#[derive(Clone, PartialEq)]
pub struct RawRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl RawRequest {
    /// First header value with the given name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// First query parameter with the given name.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

// Credentials travel in headers and the query string, neither is printed.
impl fmt::Debug for RawRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("RawRequest")
            .field("method", &self.method)
            .field("path", &self.url.path())
            .field("headers", &header_names)
            .finish_non_exhaustive()
    }
}

/// Status and raw bytes of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// Trait for transports that perform one HTTP round trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request` and return the status and body, whatever the status.
    async fn send(&self, request: RawRequest) -> Result<RawResponse, TransportFailure>;
}

// ============================================================================
// Reqwest Transport
// ============================================================================

/// Production transport using reqwest.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the configured timeouts and user agent.
    pub fn new(config: &TorBoxClientConfig) -> Result<Self, TransportFailure> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| {
                TransportFailure::new(
                    TransportCause::Config,
                    format!("failed to create HTTP client: {err}"),
                )
            })?;

        Ok(Self { client })
    }

    fn build_request(
        &self,
        request: RawRequest,
    ) -> Result<reqwest::RequestBuilder, TransportFailure> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(pairs) => builder.form(&pairs),
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart { file, fields } => {
                let part = reqwest::multipart::Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)
                    .map_err(|err| {
                        TransportFailure::new(
                            TransportCause::Request,
                            format!("invalid content type '{}': {err}", file.content_type),
                        )
                    })?;
                let form = fields.into_iter().fold(
                    reqwest::multipart::Form::new().part(file.field, part),
                    |form, (name, value)| form.text(name, value),
                );
                builder.multipart(form)
            }
        };

        Ok(builder)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: RawRequest) -> Result<RawResponse, TransportFailure> {
        let response = self.build_request(request)?.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(RawResponse::new(status, body.to_vec()))
    }
}

// ============================================================================
// Fake Transport for Testing
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Canned outcome for one call.
    #[derive(Clone)]
    pub enum Canned {
        Respond(RawResponse),
        Fail(TransportFailure),
        /// Never completes; only cancellation ends the call.
        Hang,
    }

    impl Canned {
        pub fn json(status: u16, value: &serde_json::Value) -> Self {
            Self::Respond(RawResponse::new(status, value.to_string()))
        }

        pub fn ok(value: &serde_json::Value) -> Self {
            Self::json(200, value)
        }

        pub fn raw(status: u16, body: &str) -> Self {
            Self::Respond(RawResponse::new(status, body))
        }
    }

    /// A fake transport that replays canned outcomes in order and records
    /// every request it receives.
    #[derive(Clone, Default)]
    pub struct RecordingTransport {
        script: Arc<Mutex<VecDeque<Canned>>>,
        requests: Arc<Mutex<Vec<RawRequest>>>,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue the outcome of the next call.
        pub fn then(self, canned: Canned) -> Self {
            self.script.lock().unwrap().push_back(canned);
            self
        }

        pub fn requests(&self) -> Vec<RawRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn last_request(&self) -> RawRequest {
            self.requests()
                .pop()
                .expect("no request reached the transport")
        }
    }

    #[async_trait]
    impl HttpTransport for RecordingTransport {
        async fn send(&self, request: RawRequest) -> Result<RawResponse, TransportFailure> {
            self.requests.lock().unwrap().push(request);
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(Canned::Respond(response)) => Ok(response),
                Some(Canned::Fail(failure)) => Err(failure),
                Some(Canned::Hang) => {
                    std::future::pending::<Result<RawResponse, TransportFailure>>().await
                }
                None => Ok(RawResponse::new(
                    404,
                    r#"{"success":false,"error":"NO_CANNED_RESPONSE"}"#,
                )),
            }
        }
    }
}
