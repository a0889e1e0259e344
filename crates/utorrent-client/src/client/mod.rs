//! uTorrent WebUI client implementation.

use std::path::Path;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};
use url::Url;

use utorrent_types::{
    ClientSettings, Priority, RequestResult, SettingsKey, Torrent, TorrentFileList,
    TorrentProperties, UTorrentError, UTorrentWebApi,
};

use crate::action::{
    ACTION_PARAM, Action, CACHE_ID_PARAM, FILE_INDEX_PARAM, HASH_PARAM, LIST_PARAM,
    PRIORITY_PARAM, TOKEN_PARAM, TOKEN_PATH, TORRENT_CONTENT_TYPE, TORRENT_FILE_PART, URL_PARAM,
};
use crate::cache::TorrentCache;
use crate::config::ConnectionParams;
use crate::conversions::{parse_file_lists, parse_properties, parse_settings, parse_torrent_list};
use crate::ops::WebUiTransport;
use crate::token::{TokenCache, strip_markup};
use crate::transport::{FilePart, HttpTransport, TransportError};


/// How many times a request rejected for authentication is retried with a fresh token.
const MAX_AUTH_RETRIES: usize = 1;

/// UTorrentClient talks to a uTorrent WebUI.
///
/// It fetches the request token lazily, retries once with a fresh token when the server rejects
/// a request, and keeps a local torrent cache refreshed through cache ids.
#[allow(missing_debug_implementations, private_bounds)]
pub struct UTorrentClient<T: WebUiTransport = HttpTransport> {
    transport: T,
    server_uri: Url,
    token_uri: Url,
    token: TokenCache,
    torrents: Mutex<TorrentCache>,
}

/// How a prepared request is sent.
enum Method {
    Get,
    Multipart(FilePart),
}

/// Outcome of a single authenticated attempt.
enum Attempt {
    /// The server rejected the request or the token fetch. Carries the token that was used.
    Rejected {
        stale: Option<String>,
        source: TransportError,
    },
    /// Any other failure; never retried.
    Failed(UTorrentError),
}

impl UTorrentClient {
    /// Create a new UTorrentClient.
    ///
    /// No request is made until the first operation; the token is fetched then.
    pub fn connect(params: &ConnectionParams) -> Result<Self, UTorrentError> {
        let server_uri = params.server_uri()?;
        debug!("Using uTorrent WebUI at {}", server_uri);
        let transport = HttpTransport::new(params).map_err(map_transport_error)?;
        Self::with_transport(transport, server_uri)
    }
}

#[allow(private_bounds)]
impl<T: WebUiTransport> UTorrentClient<T> {
    /// Create a UTorrentClient on top of any transport.
    pub(crate) fn with_transport(transport: T, server_uri: Url) -> Result<Self, UTorrentError> {
        let token_uri = server_uri
            .join(TOKEN_PATH)
            .map_err(|e| UTorrentError::InvalidUri(format!("{server_uri}{TOKEN_PATH}: {e}")))?;

        Ok(Self {
            transport,
            server_uri,
            token_uri,
            token: TokenCache::new(),
            torrents: Mutex::new(TorrentCache::new()),
        })
    }

    /// Shut the client down, releasing the underlying transport.
    pub fn close(self) {
        debug!("Closing uTorrent client for {}", self.server_uri);
        drop(self.transport);
    }

    /// Sends `request` with the current token attached.
    ///
    /// A rejected request invalidates the token and is retried with a freshly fetched one, at
    /// most [`MAX_AUTH_RETRIES`] times. Running out of retries means the credentials are wrong.
    async fn invoke_with_authentication(
        &self,
        request: &Url,
        method: &Method,
    ) -> Result<String, UTorrentError> {
        let mut retries_left = MAX_AUTH_RETRIES;
        loop {
            match self.attempt(request, method).await {
                Ok(body) => return Ok(body),
                Err(Attempt::Failed(err)) => return Err(err),
                Err(Attempt::Rejected { stale, source }) => {
                    if let Some(stale) = stale {
                        self.token.invalidate(&stale).await;
                    }
                    if retries_left == 0 {
                        return Err(UTorrentError::Authentication(format!(
                            "impossible to connect to uTorrent, wrong username or password ({source})"
                        )));
                    }
                    retries_left -= 1;
                    warn!(%source, "Request rejected, retrying with a fresh token");
                }
            }
        }
    }

    async fn attempt(&self, request: &Url, method: &Method) -> Result<String, Attempt> {
        let token = self.token.get_or_fetch(|| self.fetch_token()).await?;

        let mut url = request.clone();
        url.query_pairs_mut().append_pair(TOKEN_PARAM, &token);

        let response = match method {
            Method::Get => self.transport.get(url).await,
            Method::Multipart(part) => self.transport.post_multipart(url, part.clone()).await,
        };

        match response {
            Ok(Some(body)) => Ok(body),
            Ok(None) => Err(Attempt::Failed(UTorrentError::Protocol(format!(
                "received null response from server, request {}",
                request.query().unwrap_or_default()
            )))),
            Err(source) if source.is_bad_request() => Err(Attempt::Rejected {
                stale: Some(token),
                source,
            }),
            Err(err) => Err(Attempt::Failed(map_transport_error(err))),
        }
    }

    async fn fetch_token(&self) -> Result<String, Attempt> {
        match self.transport.get(self.token_uri.clone()).await {
            Ok(Some(raw)) => {
                let token = strip_markup(&raw);
                if token.is_empty() {
                    return Err(Attempt::Failed(UTorrentError::Protocol(
                        "token received is empty".into(),
                    )));
                }
                Ok(token)
            }
            Ok(None) => Err(Attempt::Failed(UTorrentError::Protocol(
                "token received is null".into(),
            ))),
            Err(source) if source.is_bad_request() => Err(Attempt::Rejected {
                stale: None,
                source,
            }),
            Err(err) => Err(Attempt::Failed(map_transport_error(err))),
        }
    }

    /// Builds `?action=..&<params>&hash=..` on the WebUI root, sends it and returns the raw body.
    async fn execute_action(
        &self,
        action: Action,
        hashes: &[String],
        params: &[(String, String)],
    ) -> Result<String, UTorrentError> {
        debug!("Executing {action} for {hashes:?}");
        let mut url = self.server_uri.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(ACTION_PARAM, action.name());
            for (name, value) in params {
                query.append_pair(name, value);
            }
            for hash in hashes {
                query.append_pair(HASH_PARAM, hash);
            }
        }

        self.invoke_with_authentication(&url, &Method::Get).await
    }

    async fn execute_base_action(
        &self,
        action: Action,
        hashes: &[String],
    ) -> Result<RequestResult, UTorrentError> {
        let body = self.execute_action(action, hashes, &[]).await?;
        let result = RequestResult::from_response(&body);
        debug!("{action} result: {result:?}");
        Ok(result)
    }

    /// Requests the torrent list, sending the cached id so the server can answer with a delta,
    /// and merges the answer. The cache stays locked for the whole exchange.
    async fn refresh_torrents(&self) -> Result<MutexGuard<'_, TorrentCache>, UTorrentError> {
        let mut cache = self.torrents.lock().await;

        let mut url = self.server_uri.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(LIST_PARAM, "1");
            if let Some(cache_id) = cache.cache_id() {
                query.append_pair(CACHE_ID_PARAM, cache_id);
            }
        }

        let body = self.invoke_with_authentication(&url, &Method::Get).await?;
        cache.update(parse_torrent_list(&body)?);
        Ok(cache)
    }
}

#[allow(private_bounds)]
impl<T: WebUiTransport> UTorrentWebApi for UTorrentClient<T> {
    async fn add_torrent_url(&self, url: &str) -> Result<RequestResult, UTorrentError> {
        debug!("Adding torrent from URL: {}", url);
        let body = self
            .execute_action(Action::AddUrl, &[], &[(URL_PARAM.into(), url.into())])
            .await?;
        Ok(RequestResult::from_response(&body))
    }

    async fn add_torrent_file(&self, torrent_file: &Path) -> Result<RequestResult, UTorrentError> {
        debug!("Adding torrent from file: {}", torrent_file.display());
        let bytes = tokio::fs::read(torrent_file).await.map_err(|e| {
            UTorrentError::FileSystem(format!("{}: {e}", torrent_file.display()))
        })?;
        let file_name = torrent_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.torrent".to_string());
        let part = FilePart {
            field_name: TORRENT_FILE_PART.to_string(),
            file_name,
            content_type: TORRENT_CONTENT_TYPE.to_string(),
            bytes,
        };

        let mut url = self.server_uri.clone();
        url.query_pairs_mut()
            .append_pair(ACTION_PARAM, Action::AddFile.name());

        let body = self
            .invoke_with_authentication(&url, &Method::Multipart(part))
            .await?;
        Ok(RequestResult::from_response(&body))
    }

    async fn torrent_list(&self) -> Result<Vec<Torrent>, UTorrentError> {
        debug!("Listing torrents");
        let torrents = self.refresh_torrents().await?.list();
        debug!("Cached torrents: {}", torrents.len());
        Ok(torrents)
    }

    async fn torrent(&self, hash: &str) -> Result<Option<Torrent>, UTorrentError> {
        debug!("Getting torrent {hash}");
        Ok(self.refresh_torrents().await?.get(hash))
    }

    async fn torrent_files(
        &self,
        hashes: &[String],
    ) -> Result<Vec<TorrentFileList>, UTorrentError> {
        let body = self.execute_action(Action::GetFiles, hashes, &[]).await?;
        parse_file_lists(&body)
    }

    async fn torrent_properties(
        &self,
        hashes: &[String],
    ) -> Result<Vec<TorrentProperties>, UTorrentError> {
        let body = self
            .execute_action(Action::GetProperties, hashes, &[])
            .await?;
        parse_properties(&body)
    }

    async fn start(&self, hashes: &[String]) -> Result<RequestResult, UTorrentError> {
        self.execute_base_action(Action::Start, hashes).await
    }

    async fn stop(&self, hashes: &[String]) -> Result<RequestResult, UTorrentError> {
        self.execute_base_action(Action::Stop, hashes).await
    }

    async fn pause(&self, hashes: &[String]) -> Result<RequestResult, UTorrentError> {
        self.execute_base_action(Action::Pause, hashes).await
    }

    async fn force_start(&self, hashes: &[String]) -> Result<RequestResult, UTorrentError> {
        self.execute_base_action(Action::ForceStart, hashes).await
    }

    async fn unpause(&self, hashes: &[String]) -> Result<RequestResult, UTorrentError> {
        self.execute_base_action(Action::Unpause, hashes).await
    }

    async fn recheck(&self, hashes: &[String]) -> Result<RequestResult, UTorrentError> {
        self.execute_base_action(Action::Recheck, hashes).await
    }

    async fn remove(&self, hashes: &[String]) -> Result<RequestResult, UTorrentError> {
        self.execute_base_action(Action::Remove, hashes).await
    }

    async fn remove_data(&self, hashes: &[String]) -> Result<RequestResult, UTorrentError> {
        self.execute_base_action(Action::RemoveData, hashes).await
    }

    async fn set_file_priority(
        &self,
        hash: &str,
        priority: Priority,
        file_indices: &[usize],
    ) -> Result<RequestResult, UTorrentError> {
        debug!("Setting priority {priority:?} on files {file_indices:?} of {hash}");
        let mut params = Vec::with_capacity(file_indices.len() + 1);
        params.push((PRIORITY_PARAM.to_string(), priority.value().to_string()));
        params.extend(
            file_indices
                .iter()
                .map(|index| (FILE_INDEX_PARAM.to_string(), index.to_string())),
        );

        let body = self
            .execute_action(Action::SetPriority, &[hash.to_string()], &params)
            .await?;
        Ok(RequestResult::from_response(&body))
    }

    async fn set_setting(
        &self,
        key: SettingsKey,
        value: &str,
    ) -> Result<RequestResult, UTorrentError> {
        self.set_setting_named(key.name(), value).await
    }

    async fn set_setting_named(
        &self,
        name: &str,
        value: &str,
    ) -> Result<RequestResult, UTorrentError> {
        self.set_settings(&[(name.to_string(), value.to_string())])
            .await
    }

    async fn set_settings(
        &self,
        settings: &[(String, String)],
    ) -> Result<RequestResult, UTorrentError> {
        debug!(
            "Changing settings {:?}",
            settings.iter().map(|(name, _)| name).collect::<Vec<_>>()
        );
        let body = self
            .execute_action(Action::SetSetting, &[], settings)
            .await?;
        Ok(RequestResult::from_response(&body))
    }

    async fn settings(&self) -> Result<ClientSettings, UTorrentError> {
        debug!("Getting client settings");
        let body = self.execute_action(Action::GetSettings, &[], &[]).await?;
        parse_settings(&body)
    }
}

/// Maps transport errors to uTorrent errors.
fn map_transport_error(err: TransportError) -> UTorrentError {
    match err {
        TransportError::BadRequest { status, body } | TransportError::Status { status, body } => {
            UTorrentError::ServerError(format!("HTTP {status}: {body}"))
        }
        TransportError::Network(msg) => UTorrentError::Network(msg),
        TransportError::Request(msg) => UTorrentError::Network(format!("invalid request: {msg}")),
    }
}
