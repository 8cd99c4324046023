//! SerpAPI-style web search client.
//!
//! `GET {base}/search.json?engine=<google|bing>&q=<query>&api_key=<key>`. The raw
//! response is large; only the organic results (title, link, snippet) are kept,
//! which is what the analysis prompts need.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::error::NodeError;

use super::{SearchEngine, SearchProvider};

/// Default SerpAPI endpoint.
pub const SERPAPI_BASE: &str = "https://serpapi.com";

const KEPT_FIELDS: [&str; 3] = ["title", "link", "snippet"];

/// Web search over a SerpAPI-compatible endpoint.
pub struct SerpApiClient {
    api_key: Arc<str>,
    base_url: String,
    client: reqwest::Client,
}

impl SerpApiClient {
    /// Client against the public SerpAPI endpoint.
    pub fn new(api_key: impl Into<Arc<str>>) -> Self {
        Self::with_client(api_key, SERPAPI_BASE, reqwest::Client::new())
    }

    /// Client with a custom base URL and HTTP client (timeouts, user agent, tests).
    pub fn with_client(
        api_key: impl Into<Arc<str>>,
        base_url: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl SearchProvider for SerpApiClient {
    async fn search(&self, query: &str, engine: SearchEngine) -> Result<Value, NodeError> {
        let url = format!("{}/search.json", self.base_url);
        let params = [
            ("engine", engine.as_str()),
            ("q", query),
            ("api_key", self.api_key.as_ref()),
        ];
        tracing::debug!(%engine, query, "SERP search");

        let response = self.client.get(&url).query(&params).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NodeError::Http(format!(
                "{} search returned {}: {}",
                engine, status, body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| NodeError::InvalidResponse(format!("{} search body: {}", engine, e)))?;
        if let Some(message) = body.get("error").and_then(Value::as_str) {
            return Err(NodeError::InvalidResponse(format!(
                "{} search error: {}",
                engine, message
            )));
        }

        Ok(trim_results(engine, query, &body))
    }
}

/// Keeps only title/link/snippet of each organic result.
fn trim_results(engine: SearchEngine, query: &str, body: &Value) -> Value {
    let organic: Vec<Value> = body
        .get("organic_results")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .map(|r| {
                    let kept: Map<String, Value> = KEPT_FIELDS
                        .iter()
                        .filter_map(|k| r.get(*k).map(|v| (k.to_string(), v.clone())))
                        .collect();
                    Value::Object(kept)
                })
                .collect()
        })
        .unwrap_or_default();
    json!({
        "engine": engine.as_str(),
        "query": query,
        "organic_results": organic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Extra fields are dropped and missing organic_results yields an empty list.
    #[test]
    fn trim_results_keeps_title_link_snippet() {
        let body = json!({
            "search_metadata": {"id": "x"},
            "organic_results": [
                {"position": 1, "title": "T", "link": "https://a", "snippet": "S", "favicon": "f"},
                {"title": "Only title"}
            ]
        });
        let out = trim_results(SearchEngine::Google, "q", &body);
        assert_eq!(out["engine"], "google");
        assert_eq!(
            out["organic_results"],
            json!([
                {"title": "T", "link": "https://a", "snippet": "S"},
                {"title": "Only title"}
            ])
        );

        let empty = trim_results(SearchEngine::Bing, "q", &json!({}));
        assert_eq!(empty["organic_results"], json!([]));
    }
}
