//! Search collaborators: web search engines and Reddit.
//!
//! The research nodes only see the [`SearchProvider`] and [`RedditSource`] traits.
//! Concrete clients talk HTTP with `reqwest`; mocks return canned JSON.

mod mock;
mod reddit;
mod serp;

pub use mock::{MockRedditSource, MockSearchProvider};
pub use reddit::RedditJsonClient;
pub use serp::SerpApiClient;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::NodeError;

/// Web search engine queried through a SERP provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    Google,
    Bing,
}

impl SearchEngine {
    /// Engine name as sent to the provider (`google`, `bing`).
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchEngine::Google => "google",
            SearchEngine::Bing => "bing",
        }
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Web search: question in, provider JSON out.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, engine: SearchEngine) -> Result<Value, NodeError>;
}

/// Reddit search and post retrieval.
///
/// `search` returns a payload with a `parsed_posts` array whose entries carry a
/// `url`; `fetch_posts` returns one JSON object per retrievable URL.
#[async_trait]
pub trait RedditSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Value, NodeError>;

    async fn fetch_posts(&self, urls: &[String]) -> Result<Vec<Value>, NodeError>;
}
