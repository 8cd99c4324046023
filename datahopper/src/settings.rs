//! Runtime settings read from the environment.
//!
//! Call `config::load_and_apply("datahopper", None)` first so `.env` and the XDG
//! `config.toml` have been merged into the process environment.

use std::time::Duration;

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_SERPAPI_BASE_URL: &str = "https://serpapi.com";
pub const DEFAULT_REDDIT_BASE_URL: &str = "https://www.reddit.com";
pub const DEFAULT_REDDIT_SEARCH_LIMIT: usize = 10;
pub const DEFAULT_REDDIT_COMMENT_LIMIT: usize = 20;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Everything needed to wire real collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchSettings {
    /// `DATAHOPPER_MODEL`.
    pub model: String,
    /// `OPENAI_API_KEY`.
    pub openai_api_key: Option<String>,
    /// `OPENAI_BASE_URL`; any OpenAI-compatible endpoint.
    pub openai_base_url: Option<String>,
    /// `SERPAPI_API_KEY`.
    pub serpapi_api_key: Option<String>,
    /// `SERPAPI_BASE_URL`.
    pub serpapi_base_url: String,
    /// `REDDIT_BASE_URL`.
    pub reddit_base_url: String,
    /// `REDDIT_SEARCH_LIMIT`.
    pub reddit_search_limit: usize,
    /// `REDDIT_COMMENT_LIMIT`.
    pub reddit_comment_limit: usize,
    /// `DATAHOPPER_MAX_CONCURRENCY`; `None` is unbounded.
    pub max_concurrency: Option<usize>,
    /// `DATAHOPPER_HTTP_TIMEOUT_SECS`.
    pub http_timeout: Duration,
    /// `DATAHOPPER_USER_AGENT`. Reddit rejects generic agents.
    pub user_agent: String,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ResearchSettings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`. Blank values count as unset; numbers that
    /// do not parse fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let number = |key: &str| get(key).and_then(|v| v.parse::<u64>().ok());

        Self {
            model: get("DATAHOPPER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL"),
            serpapi_api_key: get("SERPAPI_API_KEY"),
            serpapi_base_url: get("SERPAPI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_SERPAPI_BASE_URL.to_string()),
            reddit_base_url: get("REDDIT_BASE_URL")
                .unwrap_or_else(|| DEFAULT_REDDIT_BASE_URL.to_string()),
            reddit_search_limit: number("REDDIT_SEARCH_LIMIT")
                .map_or(DEFAULT_REDDIT_SEARCH_LIMIT, |n| n as usize),
            reddit_comment_limit: number("REDDIT_COMMENT_LIMIT")
                .map_or(DEFAULT_REDDIT_COMMENT_LIMIT, |n| n as usize),
            max_concurrency: number("DATAHOPPER_MAX_CONCURRENCY")
                .filter(|n| *n > 0)
                .map(|n| n as usize),
            http_timeout: Duration::from_secs(
                number("DATAHOPPER_HTTP_TIMEOUT_SECS").unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            ),
            user_agent: get("DATAHOPPER_USER_AGENT").unwrap_or_else(|| {
                format!("datahopper/{} (multi-source research)", env!("CARGO_PKG_VERSION"))
            }),
        }
    }
}
