//! Client settings and file priorities.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Download priority of a file inside a torrent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Priority {
    /// Do not download.
    Skip,
    #[allow(missing_docs)]
    Low,
    #[allow(missing_docs)]
    Normal,
    #[allow(missing_docs)]
    High,
}

impl Priority {
    /// Wire value of the priority.
    pub fn value(self) -> u8 {
        match self {
            Self::Skip => 0,
            Self::Low => 1,
            Self::Normal => 2,
            Self::High => 3,
        }
    }

    /// Maps a wire value back to a priority.
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Skip),
            1 => Some(Self::Low),
            2 => Some(Self::Normal),
            3 => Some(Self::High),
            _ => None,
        }
    }
}

/// Well-known client setting names.
///
/// Settings outside this set can still be changed through
/// [`crate::UTorrentWebApi::set_setting_named`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum SettingsKey {
    MaxDownloadRate,
    MaxUploadRate,
    MaxActiveDownloads,
    MaxActiveTorrents,
    BindPort,
    DirActiveDownload,
    DirActiveDownloadFlag,
    DirCompletedDownload,
    DirCompletedDownloadFlag,
    DirTorrentFiles,
    DirTorrentFilesFlag,
    Dht,
    Pex,
    Lsd,
    Upnp,
    NatPmp,
    SeedRatio,
    SeedTime,
    ConnectionsGlobally,
    ConnectionsPerTorrent,
    UploadSlotsPerTorrent,
    EncryptionMode,
    ProxyType,
    ProxyHost,
    ProxyPort,
}

impl SettingsKey {
    /// Every key, in declaration order.
    pub const ALL: [SettingsKey; 25] = [
        Self::MaxDownloadRate,
        Self::MaxUploadRate,
        Self::MaxActiveDownloads,
        Self::MaxActiveTorrents,
        Self::BindPort,
        Self::DirActiveDownload,
        Self::DirActiveDownloadFlag,
        Self::DirCompletedDownload,
        Self::DirCompletedDownloadFlag,
        Self::DirTorrentFiles,
        Self::DirTorrentFilesFlag,
        Self::Dht,
        Self::Pex,
        Self::Lsd,
        Self::Upnp,
        Self::NatPmp,
        Self::SeedRatio,
        Self::SeedTime,
        Self::ConnectionsGlobally,
        Self::ConnectionsPerTorrent,
        Self::UploadSlotsPerTorrent,
        Self::EncryptionMode,
        Self::ProxyType,
        Self::ProxyHost,
        Self::ProxyPort,
    ];

    /// The setting name used on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Self::MaxDownloadRate => "max_dl_rate",
            Self::MaxUploadRate => "max_ul_rate",
            Self::MaxActiveDownloads => "max_active_downloads",
            Self::MaxActiveTorrents => "max_active_torrent",
            Self::BindPort => "bind_port",
            Self::DirActiveDownload => "dir_active_download",
            Self::DirActiveDownloadFlag => "dir_active_download_flag",
            Self::DirCompletedDownload => "dir_completed_download",
            Self::DirCompletedDownloadFlag => "dir_completed_download_flag",
            Self::DirTorrentFiles => "dir_torrent_files",
            Self::DirTorrentFilesFlag => "dir_torrent_files_flag",
            Self::Dht => "dht",
            Self::Pex => "pex",
            Self::Lsd => "lsd",
            Self::Upnp => "upnp",
            Self::NatPmp => "natpmp",
            Self::SeedRatio => "seed_ratio",
            Self::SeedTime => "seed_time",
            Self::ConnectionsGlobally => "conns_globally",
            Self::ConnectionsPerTorrent => "conns_per_torrent",
            Self::UploadSlotsPerTorrent => "ul_slots_per_torrent",
            Self::EncryptionMode => "encryption_mode",
            Self::ProxyType => "proxy.type",
            Self::ProxyHost => "proxy.proxy",
            Self::ProxyPort => "proxy.port",
        }
    }

    /// Looks a key up by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

impl fmt::Display for SettingsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed setting value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    #[allow(missing_docs)]
    Integer(i64),
    #[allow(missing_docs)]
    Boolean(bool),
    #[allow(missing_docs)]
    Text(String),
}

/// All settings reported by the client, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClientSettings(pub BTreeMap<String, SettingValue>);

impl ClientSettings {
    /// Value of a setting by raw name.
    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.0.get(name)
    }

    /// Value of a well-known setting.
    pub fn get_key(&self, key: SettingsKey) -> Option<&SettingValue> {
        self.get(key.name())
    }

    /// Number of settings.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no settings were reported.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
