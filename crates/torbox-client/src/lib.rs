#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod client;
mod config;
mod credential;
mod decoder;
mod dispatcher;
mod envelope;
mod error;
mod fallback;
mod http;
mod normalize;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::{
    DEFAULT_PROVIDER, DefaultTorBoxClient, Links, TorBoxClient, Torrents, Usenet, UserApi,
};

// Configuration
pub use config::{DEFAULT_BASE_URL, TorBoxClientConfig};
pub use credential::CredentialStore;

// Request/response translation
pub use decoder::decode;
pub use dispatcher::{ApiRequest, DEFAULT_CREDENTIAL_PARAM, RequestDispatcher};
pub use envelope::Envelope;
pub use fallback::{FallbackCandidate, FallbackChain, resolve};
pub use normalize::{ITEM_NOT_FOUND, normalize};

// Transport
pub use error::{CallFailure, DecodeFailure, DecodeReason, TransportCause, TransportFailure};
pub use http::{
    FilePart, HttpMethod, HttpTransport, RawRequest, RawResponse, RequestBody, ReqwestTransport,
};
pub use crate::url::Params;

// Domain types, so callers need a single dependency
pub use tokio_util::sync::CancellationToken;
pub use torbox_core::{
    AddTorrentOptions, AddUsenetOptions, AuthMode, AvailableTorrent, AvailableTorrentFile,
    AvailableUsenet, ControlOperation, Credential, DownloadFile, ErrorKind, FileAvailability,
    InstantAvailability, NULL_DETAIL_ERROR, PostProcessing, ProviderFiles, QueuedTorrent,
    SeedPreference, TorBoxError, TorBoxResult, Torrent, TorrentAddResult, UsenetAddResult,
    UsenetDownload, User,
};

// Silence unused dev-dependency warnings
#[cfg(test)]
use httpmock as _;
