//! Reddit client over the public JSON endpoints.
//!
//! - search: `GET {base}/search.json?q=<query>&limit=<n>&sort=relevance`, flattened
//!   to `{"total_found": n, "parsed_posts": [{title, url, subreddit, score,
//!   num_comments, selftext}]}`;
//! - post retrieval: `GET <post url>.json?limit=<n>`, flattened to the post body
//!   plus its top-level comments.
//!
//! Posts are retrieved concurrently. Post URLs must share the scheme, host and port
//! of the base URL; any other URL is never requested. A URL that fails is logged and
//! skipped; only when every URL fails is the call an error.

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Url;
use serde_json::{json, Value};

use crate::error::NodeError;

use super::RedditSource;

/// Default Reddit origin.
pub const REDDIT_BASE: &str = "https://www.reddit.com";

/// Reddit search and post retrieval over `reqwest`.
pub struct RedditJsonClient {
    base_url: String,
    client: reqwest::Client,
    search_limit: usize,
    comment_limit: usize,
}

impl RedditJsonClient {
    /// Client against reddit.com with default limits (10 posts, 20 comments).
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(REDDIT_BASE, client)
    }

    pub fn with_base_url(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            search_limit: 10,
            comment_limit: 20,
        }
    }

    /// Number of posts requested from search.
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    /// Number of top-level comments kept per post.
    pub fn with_comment_limit(mut self, limit: usize) -> Self {
        self.comment_limit = limit;
        self
    }

    async fn get_json(&self, url: &str, params: &[(&str, String)]) -> Result<Value, NodeError> {
        let response = self.client.get(url).query(params).send().await?;
        if !response.status().is_success() {
            return Err(NodeError::Http(format!(
                "GET {} returned {}",
                url,
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|e| NodeError::InvalidResponse(format!("GET {}: {}", url, e)))
    }

    /// Rejects `url` unless it is on the same origin as `base_url`.
    fn check_origin(&self, url: &str) -> Result<(), NodeError> {
        let base = Url::parse(&self.base_url).map_err(|e| {
            NodeError::InvalidResponse(format!("Reddit base URL {}: {}", self.base_url, e))
        })?;
        let target = Url::parse(url)
            .map_err(|e| NodeError::InvalidResponse(format!("Reddit post URL {}: {}", url, e)))?;
        if target.scheme() != base.scheme()
            || target.host_str() != base.host_str()
            || target.port_or_known_default() != base.port_or_known_default()
        {
            return Err(NodeError::InvalidResponse(format!(
                "Reddit post URL {} is outside {}",
                url, self.base_url
            )));
        }
        Ok(())
    }

    async fn fetch_post(&self, url: &str) -> Result<Value, NodeError> {
        self.check_origin(url)?;
        let endpoint = format!("{}.json", url.trim_end_matches('/'));
        let body = self
            .get_json(&endpoint, &[("limit", self.comment_limit.to_string())])
            .await?;
        parse_post(url, &body, self.comment_limit)
    }
}

#[async_trait]
impl RedditSource for RedditJsonClient {
    async fn search(&self, query: &str) -> Result<Value, NodeError> {
        let url = format!("{}/search.json", self.base_url);
        tracing::debug!(query, limit = self.search_limit, "Reddit search");
        let body = self
            .get_json(
                &url,
                &[
                    ("q", query.to_string()),
                    ("limit", self.search_limit.to_string()),
                    ("sort", "relevance".to_string()),
                ],
            )
            .await?;
        parse_listing(&self.base_url, &body)
    }

    async fn fetch_posts(&self, urls: &[String]) -> Result<Vec<Value>, NodeError> {
        if urls.is_empty() {
            return Ok(Vec::new());
        }
        let results = join_all(urls.iter().map(|url| self.fetch_post(url))).await;

        let mut posts = Vec::with_capacity(urls.len());
        let mut last_error = None;
        for (url, result) in urls.iter().zip(results) {
            match result {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Reddit post retrieval failed");
                    last_error = Some(e);
                }
            }
        }

        match (posts.is_empty(), last_error) {
            (true, Some(e)) => Err(NodeError::Http(format!(
                "all {} Reddit post requests failed; last error: {}",
                urls.len(),
                e
            ))),
            _ => Ok(posts),
        }
    }
}

/// Search listing → `{total_found, parsed_posts}`.
fn parse_listing(base_url: &str, body: &Value) -> Result<Value, NodeError> {
    let children = body
        .pointer("/data/children")
        .and_then(Value::as_array)
        .ok_or_else(|| NodeError::InvalidResponse("Reddit search: missing data.children".into()))?;

    let posts: Vec<Value> = children
        .iter()
        .filter_map(|child| child.get("data"))
        .map(|post| {
            let url = post
                .get("permalink")
                .and_then(Value::as_str)
                .map(|p| format!("{}{}", base_url, p))
                .unwrap_or_default();
            json!({
                "title": post.get("title").cloned().unwrap_or(Value::Null),
                "url": url,
                "subreddit": post.get("subreddit").cloned().unwrap_or(Value::Null),
                "score": post.get("score").cloned().unwrap_or(Value::Null),
                "num_comments": post.get("num_comments").cloned().unwrap_or(Value::Null),
                "selftext": post.get("selftext").cloned().unwrap_or(Value::Null),
            })
        })
        .collect();

    Ok(json!({
        "total_found": posts.len(),
        "parsed_posts": posts,
    }))
}

/// Post page (`[post listing, comment listing]`) → post body plus top comments.
fn parse_post(url: &str, body: &Value, comment_limit: usize) -> Result<Value, NodeError> {
    let post = body
        .pointer("/0/data/children/0/data")
        .ok_or_else(|| NodeError::InvalidResponse(format!("Reddit post {}: missing post", url)))?;

    let comments: Vec<Value> = body
        .pointer("/1/data/children")
        .and_then(Value::as_array)
        .map(|children| {
            children
                .iter()
                .filter(|c| c.get("kind").and_then(Value::as_str) == Some("t1"))
                .filter_map(|c| c.get("data"))
                .take(comment_limit)
                .map(|c| {
                    json!({
                        "author": c.get("author").cloned().unwrap_or(Value::Null),
                        "body": c.get("body").cloned().unwrap_or(Value::Null),
                        "score": c.get("score").cloned().unwrap_or(Value::Null),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(json!({
        "url": url,
        "title": post.get("title").cloned().unwrap_or(Value::Null),
        "subreddit": post.get("subreddit").cloned().unwrap_or(Value::Null),
        "score": post.get("score").cloned().unwrap_or(Value::Null),
        "selftext": post.get("selftext").cloned().unwrap_or(Value::Null),
        "comments": comments,
    }))
}
