//! # uTorrent Types
//!
//! This crate defines the domain types, the error taxonomy and the [`UTorrentWebApi`] trait
//! shared by the uTorrent WebUI client and its command-line front end.

use std::path::Path;

use thiserror::Error;

mod settings;
mod torrent;

pub use settings::{ClientSettings, Priority, SettingValue, SettingsKey};
pub use torrent::{
    Torrent, TorrentFile, TorrentFileList, TorrentListUpdate, TorrentProperties, TorrentStatus,
};

/// Error type for uTorrent WebUI operations.
#[derive(Error, Debug)]
pub enum UTorrentError {
    /// The server kept rejecting requests after a fresh token was fetched.
    /// This almost always means wrong credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The server answered with an empty payload where a value was required.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Network-related errors (connection failures, timeouts, etc.)
    #[error("network error: {0}")]
    Network(String),

    /// Server returned an unexpected, non auth-related error response
    #[error("server error: {0}")]
    ServerError(String),

    /// A response body could not be parsed into the expected message
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The configured server location does not form a valid URI
    #[error("invalid URI: {0}")]
    InvalidUri(String),

    /// File system errors (torrent file not found, permission denied, etc.)
    #[error("file system error: {0}")]
    FileSystem(String),
}

/// Outcome of a WebUI action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum RequestResult {
    /// The server acknowledged the action.
    Success,
    /// The server answered without an acknowledgment.
    Fail,
}

impl RequestResult {
    /// Marker the WebUI embeds in every acknowledged response.
    pub const ACK_MARKER: &'static str = "build";

    /// Interprets a raw response body.
    ///
    /// A body is a success if and only if it contains [`Self::ACK_MARKER`]. This matches the
    /// canned `{"build": N}` acknowledgment of the WebUI and nothing more: it is a weak contract
    /// kept for compatibility with existing servers.
    pub fn from_response(body: &str) -> Self {
        if body.contains(Self::ACK_MARKER) {
            Self::Success
        } else {
            Self::Fail
        }
    }

    /// Returns true for [`RequestResult::Success`].
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// UTorrentWebApi defines the operations exposed by a uTorrent WebUI client.
///
/// Torrents are always addressed by their info hash.
#[allow(async_fn_in_trait)]
pub trait UTorrentWebApi {
    /// Add a torrent from a URL or magnet link.
    async fn add_torrent_url(&self, url: &str) -> Result<RequestResult, UTorrentError>;
    /// Upload a local .torrent file.
    async fn add_torrent_file(&self, torrent_file: &Path) -> Result<RequestResult, UTorrentError>;
    /// List all torrents, refreshing the local cache first.
    async fn torrent_list(&self) -> Result<Vec<Torrent>, UTorrentError>;
    /// Get a single torrent by hash, refreshing the local cache first.
    async fn torrent(&self, hash: &str) -> Result<Option<Torrent>, UTorrentError>;
    /// Get the files of the given torrents.
    async fn torrent_files(&self, hashes: &[String])
    -> Result<Vec<TorrentFileList>, UTorrentError>;
    /// Get the properties of the given torrents.
    async fn torrent_properties(
        &self,
        hashes: &[String],
    ) -> Result<Vec<TorrentProperties>, UTorrentError>;
    /// Start torrents.
    async fn start(&self, hashes: &[String]) -> Result<RequestResult, UTorrentError>;
    /// Stop torrents.
    async fn stop(&self, hashes: &[String]) -> Result<RequestResult, UTorrentError>;
    /// Pause torrents.
    async fn pause(&self, hashes: &[String]) -> Result<RequestResult, UTorrentError>;
    /// Force start torrents, ignoring queueing rules.
    async fn force_start(&self, hashes: &[String]) -> Result<RequestResult, UTorrentError>;
    /// Unpause torrents.
    async fn unpause(&self, hashes: &[String]) -> Result<RequestResult, UTorrentError>;
    /// Recheck the downloaded data of torrents.
    async fn recheck(&self, hashes: &[String]) -> Result<RequestResult, UTorrentError>;
    /// Remove torrents, keeping downloaded data.
    async fn remove(&self, hashes: &[String]) -> Result<RequestResult, UTorrentError>;
    /// Remove torrents together with their downloaded data.
    async fn remove_data(&self, hashes: &[String]) -> Result<RequestResult, UTorrentError>;
    /// Set the priority of files (by index) within one torrent.
    async fn set_file_priority(
        &self,
        hash: &str,
        priority: Priority,
        file_indices: &[usize],
    ) -> Result<RequestResult, UTorrentError>;
    /// Change a well-known client setting.
    async fn set_setting(
        &self,
        key: SettingsKey,
        value: &str,
    ) -> Result<RequestResult, UTorrentError>;
    /// Change a client setting by its raw name.
    async fn set_setting_named(
        &self,
        name: &str,
        value: &str,
    ) -> Result<RequestResult, UTorrentError>;
    /// Change several client settings in one request.
    async fn set_settings(
        &self,
        settings: &[(String, String)],
    ) -> Result<RequestResult, UTorrentError>;
    /// Read all client settings.
    async fn settings(&self) -> Result<ClientSettings, UTorrentError>;
}

#[cfg(test)]
mod tests {
    use super::RequestResult;

    #[test]
    fn build_marker_means_success() {
        assert_eq!(
            RequestResult::from_response("<response>build successful</response>"),
            RequestResult::Success
        );
        assert_eq!(
            RequestResult::from_response(r#"{"build":30470}"#),
            RequestResult::Success
        );
    }

    #[test]
    fn anything_else_is_a_failure() {
        assert_eq!(RequestResult::from_response("error"), RequestResult::Fail);
        assert_eq!(RequestResult::from_response(""), RequestResult::Fail);
        assert!(!RequestResult::from_response("BUILD").is_success());
    }
}
