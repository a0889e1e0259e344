//! Torrent, file and property types as reported by the WebUI.

use serde::Serialize;

use crate::Priority;

/// Status bitfield of a torrent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TorrentStatus(pub u32);

impl TorrentStatus {
    /// The torrent is started.
    pub const STARTED: u32 = 1;
    /// The torrent is being checked.
    pub const CHECKING: u32 = 1 << 1;
    /// The torrent starts once checking completes.
    pub const START_AFTER_CHECK: u32 = 1 << 2;
    /// The torrent has been checked.
    pub const CHECKED: u32 = 1 << 3;
    /// The torrent is in an error state.
    pub const ERROR: u32 = 1 << 4;
    /// The torrent is paused.
    pub const PAUSED: u32 = 1 << 5;
    /// The torrent is queued.
    pub const QUEUED: u32 = 1 << 6;
    /// The torrent is loaded.
    pub const LOADED: u32 = 1 << 7;

    fn has(self, flag: u32) -> bool {
        self.0 & flag != 0
    }

    #[allow(missing_docs)]
    pub fn is_started(self) -> bool {
        self.has(Self::STARTED)
    }

    #[allow(missing_docs)]
    pub fn is_checking(self) -> bool {
        self.has(Self::CHECKING)
    }

    #[allow(missing_docs)]
    pub fn is_paused(self) -> bool {
        self.has(Self::PAUSED)
    }

    #[allow(missing_docs)]
    pub fn is_error(self) -> bool {
        self.has(Self::ERROR)
    }

    #[allow(missing_docs)]
    pub fn is_queued(self) -> bool {
        self.has(Self::QUEUED)
    }

    #[allow(missing_docs)]
    pub fn is_loaded(self) -> bool {
        self.has(Self::LOADED)
    }
}

/// Torrent information, one row of the WebUI torrent list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(missing_docs)] // rationale: same fields as the WebUI list row
pub struct Torrent {
    pub hash: String,

    pub status: TorrentStatus,

    pub name: String,

    pub size: i64,

    /// Progress in per mille (1000 = complete).
    pub progress: i64,

    pub downloaded: i64,

    pub uploaded: i64,

    /// Share ratio in per mille.
    pub ratio: i64,

    pub upload_speed: i64,

    pub download_speed: i64,

    pub eta: i64,

    pub label: String,

    pub peers_connected: i64,

    pub peers_in_swarm: i64,

    pub seeds_connected: i64,

    pub seeds_in_swarm: i64,

    /// Availability in 1/65536ths.
    pub availability: i64,

    pub queue_order: i64,

    pub remaining: i64,
}

impl Torrent {
    /// Progress as a fraction between 0.0 and 1.0.
    pub fn percent_done(&self) -> f64 {
        self.progress as f64 / 1000.0
    }
}

/// A torrent list message, either a full snapshot or a delta against a previous cache id.
#[derive(Debug, Clone, PartialEq)]
pub enum TorrentListUpdate {
    /// The complete torrent set.
    Snapshot {
        /// Every torrent known to the server.
        torrents: Vec<Torrent>,
        /// Identifier of this list state.
        cache_id: Option<String>,
    },
    /// Changes since the cache id sent with the request.
    Delta {
        /// Added or updated torrents.
        changed: Vec<Torrent>,
        /// Hashes of removed torrents.
        removed: Vec<String>,
        /// Identifier of the resulting list state.
        cache_id: Option<String>,
    },
}

impl TorrentListUpdate {
    /// The cache id carried by the message.
    pub fn cache_id(&self) -> Option<&str> {
        match self {
            Self::Snapshot { cache_id, .. } | Self::Delta { cache_id, .. } => cache_id.as_deref(),
        }
    }
}

/// A single file inside a torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct TorrentFile {
    pub name: String,

    pub size: i64,

    pub downloaded: i64,

    pub priority: Priority,
}

/// Files of one torrent, in the index order used by [`crate::UTorrentWebApi::set_file_priority`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TorrentFileList {
    /// Hash of the owning torrent.
    pub hash: String,
    /// The files, position is the file index.
    pub files: Vec<TorrentFile>,
}

/// Per-torrent properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct TorrentProperties {
    pub hash: String,

    pub trackers: Vec<String>,

    pub upload_rate: i64,

    pub download_rate: i64,

    pub superseed: i64,

    pub dht: i64,

    pub pex: i64,

    pub seed_override: i64,

    pub seed_ratio: i64,

    pub seed_time: i64,

    pub upload_slots: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_flags() {
        let status = TorrentStatus(TorrentStatus::STARTED | TorrentStatus::LOADED | 8);
        assert!(status.is_started());
        assert!(status.is_loaded());
        assert!(!status.is_paused());
        assert!(!status.is_error());

        let paused = TorrentStatus(233);
        assert!(paused.is_paused());
        assert!(paused.is_queued());
    }

    #[test]
    fn cache_id_of_either_variant() {
        let snapshot = TorrentListUpdate::Snapshot {
            torrents: vec![],
            cache_id: Some("1".into()),
        };
        let delta = TorrentListUpdate::Delta {
            changed: vec![],
            removed: vec![],
            cache_id: None,
        };
        assert_eq!(snapshot.cache_id(), Some("1"));
        assert_eq!(delta.cache_id(), None);
    }
}
