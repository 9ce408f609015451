//! Torrent types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::de;

/// Download state reported for torrents that are still waiting in the queue.
pub const QUEUED_STATE: &str = "queued";

/// A torrent in the user's list (active or synthesized from the queue).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Torrent {
    pub id: i64,
    #[serde(default, deserialize_with = "de::or_default")]
    pub auth_id: String,
    pub hash: String,
    #[serde(default, deserialize_with = "de::or_default")]
    pub name: String,
    #[serde(default)]
    pub magnet: Option<String>,
    /// Total size in bytes
    #[serde(default, deserialize_with = "de::or_default")]
    pub size: i64,
    #[serde(default, deserialize_with = "de::or_default")]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::or_default")]
    pub download_state: String,
    #[serde(default, deserialize_with = "de::or_default")]
    pub seeds: i64,
    #[serde(default, deserialize_with = "de::or_default")]
    pub peers: i64,
    #[serde(default, deserialize_with = "de::or_default")]
    pub ratio: f64,
    /// Completion between 0.0 and 1.0
    #[serde(default, deserialize_with = "de::or_default")]
    pub progress: f64,
    /// Bytes per second
    #[serde(default, deserialize_with = "de::or_default")]
    pub download_speed: i64,
    /// Bytes per second
    #[serde(default, deserialize_with = "de::or_default")]
    pub upload_speed: i64,
    /// Seconds remaining
    #[serde(default, deserialize_with = "de::or_default")]
    pub eta: i64,
    /// Whether the torrent was added from a `.torrent` file
    #[serde(default, deserialize_with = "de::present_flag")]
    pub torrent_file: bool,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::or_default")]
    pub download_present: bool,
    #[serde(default, deserialize_with = "de::or_default")]
    pub download_finished: bool,
    #[serde(default, deserialize_with = "de::or_default")]
    pub files: Vec<DownloadFile>,
}

impl Torrent {
    /// True for entries that are waiting in the queue rather than running.
    #[must_use]
    pub fn is_queued(&self) -> bool {
        self.download_state == QUEUED_STATE
    }
}

/// A file inside a torrent or usenet download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadFile {
    pub id: i64,
    #[serde(default, deserialize_with = "de::or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "de::or_default")]
    pub size: i64,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
}

/// An entry of the torrent queue (not yet started on the service).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedTorrent {
    pub id: i64,
    #[serde(default, deserialize_with = "de::or_default")]
    pub auth_id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub magnet: Option<String>,
    #[serde(default, deserialize_with = "de::present_flag")]
    pub torrent_file: bool,
    pub hash: String,
    #[serde(default, deserialize_with = "de::or_default")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl From<QueuedTorrent> for Torrent {
    fn from(queued: QueuedTorrent) -> Self {
        Self {
            id: queued.id,
            auth_id: queued.auth_id,
            hash: queued.hash,
            name: queued.name,
            magnet: queued.magnet,
            size: 0,
            active: false,
            created_at: queued.created_at,
            updated_at: queued.created_at,
            download_state: QUEUED_STATE.to_string(),
            seeds: 0,
            peers: 0,
            ratio: 0.0,
            progress: 0.0,
            download_speed: 0,
            upload_speed: 0,
            eta: 0,
            torrent_file: queued.torrent_file,
            expires_at: None,
            download_present: false,
            download_finished: false,
            files: Vec::new(),
        }
    }
}

/// Result of adding a torrent by file or magnet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentAddResult {
    #[serde(
        rename = "torrent_id",
        alias = "id",
        default,
        deserialize_with = "de::opt_string_or_number"
    )]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub auth_id: Option<String>,
    #[serde(default, alias = "uri")]
    pub url: Option<String>,
}

/// Operation accepted by the torrent and usenet control endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlOperation {
    Pause,
    Resume,
    Reannounce,
    Delete,
}

impl ControlOperation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Reannounce => "reannounce",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for ControlOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seeding preference sent when adding a torrent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SeedPreference {
    /// Follow the account setting
    #[default]
    Auto,
    /// Always seed
    Seed,
    /// Never seed
    NoSeed,
}

impl SeedPreference {
    /// Wire value of the `seed` field.
    #[must_use]
    pub const fn as_param(self) -> u8 {
        match self {
            Self::Auto => 1,
            Self::Seed => 2,
            Self::NoSeed => 3,
        }
    }
}

/// Options for adding a torrent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddTorrentOptions {
    pub seed: SeedPreference,
    pub allow_zip: bool,
    /// Display name override; omitted from the request when `None`
    pub name: Option<String>,
}

impl AddTorrentOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: SeedPreference) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub const fn with_allow_zip(mut self, allow_zip: bool) -> Self {
        self.allow_zip = allow_zip;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
