//! Cache availability lookups.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::de;

/// A cached torrent as reported by `checkcached`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableTorrent {
    #[serde(default, deserialize_with = "de::or_default")]
    pub name: String,
    /// Size in bytes
    #[serde(default, deserialize_with = "de::or_default")]
    pub size: i64,
    pub hash: String,
    /// Only present when the lookup asked for file listings
    #[serde(default)]
    pub files: Option<Vec<AvailableTorrentFile>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableTorrentFile {
    #[serde(default, deserialize_with = "de::or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "de::or_default")]
    pub size: i64,
}

/// A cached usenet download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableUsenet {
    #[serde(default, deserialize_with = "de::or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "de::or_default")]
    pub size: i64,
    pub hash: String,
}

/// One file of an instant-availability variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAvailability {
    #[serde(default, deserialize_with = "de::or_default")]
    pub filename: String,
    #[serde(default, deserialize_with = "de::or_default")]
    pub filesize: i64,
}

/// Cached variants for one provider: each variant maps file id to file.
pub type ProviderFiles = Vec<HashMap<String, FileAvailability>>;

/// Instant availability: hash, then provider, then cached variants.
pub type InstantAvailability = HashMap<String, HashMap<String, ProviderFiles>>;
