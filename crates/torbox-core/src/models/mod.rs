//! Domain types returned by the TorBox client.
//!
//! Field types are lenient where the service is known to be inconsistent
//! (numbers sent as strings, `null` for counters, flags sent as paths), so a
//! cosmetic drift does not turn into a protocol error.

mod availability;
mod de;
mod torrent;
mod usenet;
mod user;

pub use availability::{
    AvailableTorrent, AvailableTorrentFile, AvailableUsenet, FileAvailability,
    InstantAvailability, ProviderFiles,
};
pub use torrent::{
    AddTorrentOptions, ControlOperation, DownloadFile, QueuedTorrent, SeedPreference, Torrent,
    TorrentAddResult, QUEUED_STATE,
};
pub use usenet::{AddUsenetOptions, PostProcessing, UsenetAddResult, UsenetDownload};
pub use user::User;
