//! Usenet download types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DownloadFile;
use super::de;

/// A usenet download in the user's list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsenetDownload {
    pub id: i64,
    #[serde(default, deserialize_with = "de::or_default")]
    pub auth_id: String,
    pub hash: String,
    #[serde(default, deserialize_with = "de::or_default")]
    pub name: String,
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
    pub progress: f64,
    #[serde(default, deserialize_with = "de::or_default")]
    pub download_speed: i64,
    #[serde(default, deserialize_with = "de::or_default")]
    pub eta: i64,
    #[serde(default, deserialize_with = "de::or_default")]
    pub download_present: bool,
    #[serde(default, deserialize_with = "de::or_default")]
    pub download_finished: bool,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::or_default")]
    pub files: Vec<DownloadFile>,
}

/// Result of adding a usenet download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsenetAddResult {
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub usenetdownload_id: Option<i64>,
    #[serde(default)]
    pub auth_id: Option<String>,
}

/// Post-processing applied by the service after a usenet download completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PostProcessing {
    /// Follow the account setting
    #[default]
    Default,
    None,
    Repair,
    RepairUnpack,
    RepairUnpackDelete,
}

impl PostProcessing {
    /// Wire value of the `post_processing` field.
    #[must_use]
    pub const fn as_param(self) -> i8 {
        match self {
            Self::Default => -1,
            Self::None => 0,
            Self::Repair => 1,
            Self::RepairUnpack => 2,
            Self::RepairUnpackDelete => 3,
        }
    }
}

/// Options for adding a usenet download.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddUsenetOptions {
    pub post_processing: PostProcessing,
    pub name: Option<String>,
}

impl AddUsenetOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_post_processing(mut self, post_processing: PostProcessing) -> Self {
        self.post_processing = post_processing;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
