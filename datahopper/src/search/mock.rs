//! Canned search collaborators for tests and offline runs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::NodeError;

use super::{RedditSource, SearchEngine, SearchProvider};

/// Returns a fixed payload per engine, or fails for selected engines.
pub struct MockSearchProvider {
    google: Value,
    bing: Value,
    failing: Vec<SearchEngine>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl Default for MockSearchProvider {
    fn default() -> Self {
        Self::new(
            json!({"engine": "google", "organic_results": [
                {"title": "Google result", "link": "https://example.com/g", "snippet": "from google"}
            ]}),
            json!({"engine": "bing", "organic_results": [
                {"title": "Bing result", "link": "https://example.com/b", "snippet": "from bing"}
            ]}),
        )
    }
}

impl MockSearchProvider {
    pub fn new(google: Value, bing: Value) -> Self {
        Self {
            google,
            bing,
            failing: Vec::new(),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Makes searches on `engine` fail with an HTTP error.
    pub fn failing_on(mut self, engine: SearchEngine) -> Self {
        self.failing.push(engine);
        self
    }

    /// Sleeps before answering, so concurrent calls overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(&self, _query: &str, engine: SearchEngine) -> Result<Value, NodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(&engine) {
            return Err(NodeError::Http(format!("{} search unavailable", engine)));
        }
        Ok(match engine {
            SearchEngine::Google => self.google.clone(),
            SearchEngine::Bing => self.bing.clone(),
        })
    }
}

/// Returns a fixed search payload and fixed posts; records requested URLs.
pub struct MockRedditSource {
    search_result: Value,
    posts: Vec<Value>,
    fail_search: bool,
    fail_fetch: bool,
    fetch_calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl Default for MockRedditSource {
    fn default() -> Self {
        Self::new(
            json!({"total_found": 2, "parsed_posts": [
                {"title": "Thread one", "url": "https://www.reddit.com/r/test/comments/1/one/"},
                {"title": "Thread two", "url": "https://www.reddit.com/r/test/comments/2/two/"}
            ]}),
            vec![json!({"title": "Thread one", "comments": [{"body": "helpful"}]})],
        )
    }
}

impl MockRedditSource {
    pub fn new(search_result: Value, posts: Vec<Value>) -> Self {
        Self {
            search_result,
            posts,
            fail_search: false,
            fail_fetch: false,
            fetch_calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    /// Number of `fetch_posts` calls so far.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// URLs passed to `fetch_posts`, across all calls.
    pub fn requested_urls(&self) -> Vec<String> {
        self.requested
            .lock()
            .map(|urls| urls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RedditSource for MockRedditSource {
    async fn search(&self, _query: &str) -> Result<Value, NodeError> {
        if self.fail_search {
            return Err(NodeError::Http("reddit search unavailable".into()));
        }
        Ok(self.search_result.clone())
    }

    async fn fetch_posts(&self, urls: &[String]) -> Result<Vec<Value>, NodeError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requested) = self.requested.lock() {
            requested.extend(urls.iter().cloned());
        }
        if self.fail_fetch {
            return Err(NodeError::Http("reddit post retrieval unavailable".into()));
        }
        Ok(self.posts.clone())
    }
}
