//! Request token handling.
//!
//! The WebUI hands out a token wrapped in a small HTML document. The token is fetched lazily,
//! shared by every request of a client and dropped when the server rejects it.

use std::future::Future;
use std::sync::LazyLock;

use regex::Regex;
use tokio::sync::RwLock;
use tracing::{debug, info};

static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("markup pattern is a valid regex"));

/// Removes every `<...>` tag from the token page, leaving the token itself.
pub(crate) fn strip_markup(raw: &str) -> String {
    MARKUP.replace_all(raw, "").into_owned()
}

/// Single-flight holder for the current token.
///
/// Concurrent callers that find no token wait on one fetch and all observe its result.
#[derive(Debug, Default)]
pub(crate) struct TokenCache {
    slot: RwLock<Option<String>>,
}

impl TokenCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token, running `fetch` exactly once if there is none.
    ///
    /// A failed fetch leaves the cache empty; the next caller fetches again.
    pub(crate) async fn get_or_fetch<F, Fut, E>(&self, fetch: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        if let Some(token) = self.slot.read().await.as_ref() {
            return Ok(token.clone());
        }

        let mut slot = self.slot.write().await;
        // Another caller may have fetched while we waited for the write lock.
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }

        debug!("Fetching a new WebUI token");
        let token = fetch().await?;
        info!("WebUI token refreshed");
        *slot = Some(token.clone());
        Ok(token)
    }

    /// Drops the cached token if it is still `stale`.
    ///
    /// A token already replaced by a concurrent refresh is kept.
    pub(crate) async fn invalidate(&self, stale: &str) {
        let mut slot = self.slot.write().await;
        if slot.as_deref() == Some(stale) {
            debug!("Marking WebUI token as expired");
            *slot = None;
        }
    }

    #[cfg(test)]
    pub(crate) async fn current(&self) -> Option<String> {
        self.slot.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::future::join_all;

    use super::*;

    #[test]
    fn strips_surrounding_markup() {
        let raw = "<html><div id='token' style='display:none;'>abc-123_XYZ</div></html>";
        assert_eq!(strip_markup(raw), "abc-123_XYZ");
    }

    #[test]
    fn strips_nothing_from_bare_token() {
        assert_eq!(strip_markup("plain"), "plain");
        assert_eq!(strip_markup("<p></p>"), "");
    }

    #[test]
    fn only_tags_are_removed() {
        assert_eq!(strip_markup("<div>tok</div>\n"), "tok\n");
        assert_eq!(strip_markup("<a href='x'>t<b>o</b>k</a>"), "tok");
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_fetch() {
        let cache = TokenCache::new();
        let fetches = AtomicUsize::new(0);
        let fetches = &fetches;

        let callers = (0..16).map(|_| {
            cache.get_or_fetch(move || async move {
                let n = fetches.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
                Ok::<_, ()>(format!("token-{n}"))
            })
        });
        let tokens = join_all(callers).await;

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(tokens.iter().all(|t| t.as_deref() == Ok("token-0")));
    }

    #[tokio::test]
    async fn failed_fetch_leaves_cache_empty() {
        let cache = TokenCache::new();
        let result = cache
            .get_or_fetch(|| async { Err::<String, _>("boom") })
            .await;
        assert_eq!(result, Err("boom"));
        assert_eq!(cache.current().await, None);

        let token = cache
            .get_or_fetch(|| async { Ok::<_, &str>("fresh".to_string()) })
            .await;
        assert_eq!(token, Ok("fresh".to_string()));
    }

    #[tokio::test]
    async fn invalidate_only_drops_the_stale_token() {
        let cache = TokenCache::new();
        cache
            .get_or_fetch(|| async { Ok::<_, ()>("first".to_string()) })
            .await
            .unwrap();

        cache.invalidate("other").await;
        assert_eq!(cache.current().await.as_deref(), Some("first"));

        cache.invalidate("first").await;
        assert_eq!(cache.current().await, None);

        let refetched = cache
            .get_or_fetch(|| async { Ok::<_, ()>("second".to_string()) })
            .await;
        assert_eq!(refetched, Ok("second".to_string()));
    }
}
