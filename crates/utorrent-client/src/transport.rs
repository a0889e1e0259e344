//! HTTP transport for the WebUI, built on reqwest.

use std::fmt;

use reqwest::{Client, RequestBuilder, multipart};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::ConnectionParams;

/// Errors raised by the transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The server answered with a 4xx status. The WebUI does so for a stale token as well as for
    /// wrong credentials.
    #[error("bad request: HTTP {status}")]
    BadRequest {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The server answered with any other non-success status.
    #[error("unexpected status: HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Connection failures, timeouts and body read errors.
    #[error("network error: {0}")]
    Network(String),

    /// The request could not be assembled.
    #[error("invalid request: {0}")]
    Request(String),
}

impl TransportError {
    /// Whether the failure means the request was rejected as unauthenticated.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest { .. })
    }
}

/// A file to upload as one multipart part.
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Name of the form field.
    pub field_name: String,
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type of the part.
    pub content_type: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("field_name", &self.field_name)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// reqwest based transport with a cookie store and basic authentication.
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    username: String,
    password: String,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("username", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Builds the HTTP client described by `params`.
    pub fn new(params: &ConnectionParams) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(params.timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| TransportError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            username: params.username.clone(),
            password: params.password.clone(),
        })
    }

    /// Performs a GET and returns the body, `None` when it is empty.
    pub async fn get(&self, url: Url) -> Result<Option<String>, TransportError> {
        debug!(path = url.path(), "GET");
        self.send(self.http.get(url)).await
    }

    /// Performs a multipart POST carrying `part` and returns the body, `None` when it is empty.
    pub async fn post_multipart(
        &self,
        url: Url,
        part: FilePart,
    ) -> Result<Option<String>, TransportError> {
        debug!(path = url.path(), file = %part.file_name, "POST multipart");
        let field_name = part.field_name;
        let part = multipart::Part::bytes(part.bytes)
            .file_name(part.file_name)
            .mime_str(&part.content_type)
            .map_err(|e| TransportError::Request(format!("invalid content type: {e}")))?;
        let form = multipart::Form::new().part(field_name, part);

        self.send(self.http.post(url).multipart(form)).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Option<String>, TransportError> {
        let response = request
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if status.is_client_error() {
            return Err(TransportError::BadRequest {
                status: status.as_u16(),
                body,
            });
        }
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(if body.is_empty() { None } else { Some(body) })
    }
}
