#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod credential;
pub mod error;
pub mod models;

// Re-export commonly used types for convenience
pub use credential::{AuthMode, Credential};
pub use error::{ErrorKind, NULL_DETAIL_ERROR, TorBoxError, TorBoxResult};
pub use models::{
    AddTorrentOptions, AddUsenetOptions, AvailableTorrent, AvailableTorrentFile, AvailableUsenet,
    ControlOperation, DownloadFile, FileAvailability, InstantAvailability, PostProcessing,
    ProviderFiles, QueuedTorrent, SeedPreference, Torrent, TorrentAddResult, UsenetAddResult,
    UsenetDownload, User,
};
