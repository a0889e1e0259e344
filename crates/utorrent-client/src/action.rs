//! WebUI actions and the query parameter names they use.

use std::fmt;

pub(crate) const ACTION_PARAM: &str = "action";
pub(crate) const TOKEN_PARAM: &str = "token";
pub(crate) const URL_PARAM: &str = "s";
pub(crate) const LIST_PARAM: &str = "list";
pub(crate) const CACHE_ID_PARAM: &str = "cid";
pub(crate) const HASH_PARAM: &str = "hash";
pub(crate) const FILE_INDEX_PARAM: &str = "f";
pub(crate) const PRIORITY_PARAM: &str = "p";

/// Multipart field carrying an uploaded torrent.
pub(crate) const TORRENT_FILE_PART: &str = "torrent_file";
/// Content type of an uploaded torrent.
pub(crate) const TORRENT_CONTENT_TYPE: &str = "application/x-bittorrent";

/// Path, relative to the WebUI root, serving the request token.
pub(crate) const TOKEN_PATH: &str = "token.html";
/// Root of the WebUI on the server.
pub(crate) const GUI_PATH: &str = "/gui/";

/// A named remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Action {
    AddUrl,
    AddFile,
    Start,
    Stop,
    Pause,
    ForceStart,
    Unpause,
    Recheck,
    Remove,
    RemoveData,
    SetPriority,
    GetFiles,
    GetProperties,
    GetSettings,
    SetSetting,
}

impl Action {
    /// The action name sent in the `action` query parameter.
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::AddUrl => "add-url",
            Self::AddFile => "add-file",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Pause => "pause",
            Self::ForceStart => "forcestart",
            Self::Unpause => "unpause",
            Self::Recheck => "recheck",
            Self::Remove => "remove",
            Self::RemoveData => "removedata",
            Self::SetPriority => "setprio",
            Self::GetFiles => "getfiles",
            Self::GetProperties => "getprops",
            Self::GetSettings => "getsettings",
            Self::SetSetting => "setsetting",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
