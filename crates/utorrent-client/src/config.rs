//! Connection settings for a WebUI server.

use std::{env, fmt, time::Duration};

use url::Url;
use utorrent_types::UTorrentError;

use crate::action::GUI_PATH;

const DEFAULT_SCHEME: &str = "http";
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the WebUI lives and how to log into it.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    /// `http` or `https`.
    pub scheme: String,
    /// Host name or address of the server.
    pub host: String,
    /// Port the WebUI listens on.
    pub port: u16,
    /// WebUI user name.
    pub username: String,
    /// WebUI password.
    pub password: String,
    /// Per-request timeout handed to the HTTP transport.
    pub timeout: Duration,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            username: String::new(),
            password: String::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ConnectionParams {
    /// Reads the parameters from `UTORRENT_*` environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            scheme: env::var("UTORRENT_SCHEME").unwrap_or(defaults.scheme),
            host: env::var("UTORRENT_HOST").unwrap_or(defaults.host),
            port: env::var("UTORRENT_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            username: env::var("UTORRENT_USERNAME").unwrap_or_default(),
            password: env::var("UTORRENT_PASSWORD").unwrap_or_default(),
            timeout: env::var("UTORRENT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    /// The WebUI root, `scheme://host:port/gui/`.
    pub fn server_uri(&self) -> Result<Url, UTorrentError> {
        let raw = format!("{}://{}:{}{}", self.scheme, self.host, self.port, GUI_PATH);
        let url = Url::parse(&raw)
            .map_err(|e| UTorrentError::InvalidUri(format!("{raw}: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(UTorrentError::InvalidUri(format!("{raw}: not a base URI")));
        }
        Ok(url)
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print credentials.
        write!(
            f,
            "ConnectionParams(uri=\"{}://{}:{}\", username=<{}>, password=<{}>, timeout={:?})",
            self.scheme,
            self.host,
            self.port,
            if self.username.is_empty() { "unset" } else { "set" },
            if self.password.is_empty() { "unset" } else { "set" },
            self.timeout,
        )
    }
}
