//! Local copy of the server's torrent list, kept in sync through cache ids.

use std::collections::BTreeMap;

use tracing::debug;
use utorrent_types::{Torrent, TorrentListUpdate};

/// Torrents keyed by hash plus the cache id of the last list message applied.
#[derive(Debug, Default)]
pub(crate) struct TorrentCache {
    torrents: BTreeMap<String, Torrent>,
    cache_id: Option<String>,
}

impl TorrentCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Cache id to send with the next list request, if any message was applied yet.
    pub(crate) fn cache_id(&self) -> Option<&str> {
        self.cache_id.as_deref()
    }

    /// Merges a list message into the cache.
    ///
    /// A snapshot replaces the whole set. A delta upserts changed torrents, last write wins,
    /// then drops removed hashes. Either way the cache id becomes the message's.
    pub(crate) fn update(&mut self, update: TorrentListUpdate) {
        match update {
            TorrentListUpdate::Snapshot { torrents, cache_id } => {
                debug!(count = torrents.len(), ?cache_id, "Applying torrent snapshot");
                self.torrents = torrents.into_iter().map(|t| (t.hash.clone(), t)).collect();
                self.cache_id = cache_id;
            }
            TorrentListUpdate::Delta {
                changed,
                removed,
                cache_id,
            } => {
                debug!(
                    changed = changed.len(),
                    removed = removed.len(),
                    previous = ?self.cache_id,
                    ?cache_id,
                    "Applying torrent delta"
                );
                for torrent in changed {
                    self.torrents.insert(torrent.hash.clone(), torrent);
                }
                for hash in &removed {
                    self.torrents.remove(hash);
                }
                self.cache_id = cache_id;
            }
        }
    }

    pub(crate) fn get(&self, hash: &str) -> Option<Torrent> {
        self.torrents.get(hash).cloned()
    }

    /// Point-in-time copy of every cached torrent, ordered by hash.
    pub(crate) fn list(&self) -> Vec<Torrent> {
        self.torrents.values().cloned().collect()
    }
}
