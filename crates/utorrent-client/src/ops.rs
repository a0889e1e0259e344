//! Internal trait abstracting WebUI HTTP operations.
//!
//! This module provides the [`WebUiTransport`] trait which abstracts the underlying
//! HTTP transport, enabling mocking in tests.

use url::Url;

use crate::transport::{FilePart, HttpTransport, TransportError};

/// Internal trait that abstracts the transport operations.
/// This allows for mocking in tests.
#[cfg_attr(test, mockall::automock)]
#[allow(async_fn_in_trait)]
pub(crate) trait WebUiTransport {
    async fn get(&self, url: Url) -> Result<Option<String>, TransportError>;
    async fn post_multipart(
        &self,
        url: Url,
        part: FilePart,
    ) -> Result<Option<String>, TransportError>;
}

impl WebUiTransport for HttpTransport {
    async fn get(&self, url: Url) -> Result<Option<String>, TransportError> {
        HttpTransport::get(self, url).await
    }

    async fn post_multipart(
        &self,
        url: Url,
        part: FilePart,
    ) -> Result<Option<String>, TransportError> {
        HttpTransport::post_multipart(self, url, part).await
    }
}
