//! Research graph nodes.
//!
//! Searches and analyses propagate every collaborator error (the run aborts).
//! URL selection and post retrieval recover locally and always produce a list.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::NodeError;
use crate::graph::Node;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::search::{RedditSource, SearchEngine, SearchProvider};
use crate::state::{ResearchState, ResearchUpdate};

use super::prompts;
use super::url_selection::{extract_url_array, fallback_urls, is_empty_payload};
use super::{
    ANALYZE_BING, ANALYZE_GOOGLE, ANALYZE_REDDIT, FETCH_REDDIT_POSTS, SEARCH_BING,
    SEARCH_GOOGLE, SEARCH_REDDIT, SELECT_REDDIT_URLS, SYNTHESIZE,
};

/// Web search on one engine; writes `google_results` or `bing_results`.
pub struct SearchNode {
    engine: SearchEngine,
    provider: Arc<dyn SearchProvider>,
}

impl SearchNode {
    pub fn new(engine: SearchEngine, provider: Arc<dyn SearchProvider>) -> Self {
        Self { engine, provider }
    }
}

#[async_trait]
impl Node<ResearchState> for SearchNode {
    fn id(&self) -> &str {
        match self.engine {
            SearchEngine::Google => SEARCH_GOOGLE,
            SearchEngine::Bing => SEARCH_BING,
        }
    }

    async fn run(&self, state: Arc<ResearchState>) -> Result<ResearchUpdate, NodeError> {
        info!(engine = %self.engine, question = %state.user_question, "Searching");
        let results = self
            .provider
            .search(&state.user_question, self.engine)
            .await?;
        let mut update = ResearchUpdate::default();
        match self.engine {
            SearchEngine::Google => update.google_results = Some(results),
            SearchEngine::Bing => update.bing_results = Some(results),
        }
        Ok(update)
    }
}

/// Reddit search; writes `reddit_results`.
pub struct RedditSearchNode {
    reddit: Arc<dyn RedditSource>,
}

impl RedditSearchNode {
    pub fn new(reddit: Arc<dyn RedditSource>) -> Self {
        Self { reddit }
    }
}

#[async_trait]
impl Node<ResearchState> for RedditSearchNode {
    fn id(&self) -> &str {
        SEARCH_REDDIT
    }

    async fn run(&self, state: Arc<ResearchState>) -> Result<ResearchUpdate, NodeError> {
        info!(question = %state.user_question, "Searching Reddit");
        let results = self.reddit.search(&state.user_question).await?;
        Ok(ResearchUpdate {
            reddit_results: Some(results),
            ..Default::default()
        })
    }
}

/// Picks the Reddit threads worth retrieving; writes `selected_reddit_urls`.
///
/// Never fails: an empty search result short-circuits to `[]` without calling the
/// model, and an unusable reply (or a failed call) falls back to the first
/// `parsed_posts` URLs.
pub struct SelectRedditUrlsNode {
    llm: Arc<dyn LlmClient>,
}

impl SelectRedditUrlsNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Node<ResearchState> for SelectRedditUrlsNode {
    fn id(&self) -> &str {
        SELECT_REDDIT_URLS
    }

    async fn run(&self, state: Arc<ResearchState>) -> Result<ResearchUpdate, NodeError> {
        let urls = match state.reddit_results.as_ref() {
            Some(results) if !is_empty_payload(Some(results)) => {
                let prompt = prompts::reddit_url_selection(&state.user_question, results);
                match self.llm.complete(&prompt.system, &prompt.user).await {
                    Ok(reply) => extract_url_array(&reply).unwrap_or_else(|| {
                        debug!("No URL array in model reply; using parsed_posts");
                        fallback_urls(results)
                    }),
                    Err(e) => {
                        warn!(error = %e, "URL selection call failed; using parsed_posts");
                        fallback_urls(results)
                    }
                }
            }
            _ => Vec::new(),
        };
        info!(count = urls.len(), ?urls, "Selected Reddit URLs");
        Ok(ResearchUpdate {
            selected_reddit_urls: Some(urls),
            ..Default::default()
        })
    }
}

/// Retrieves the selected threads; writes `reddit_post_data`.
///
/// No URLs means no call. A provider failure degrades to an empty list.
pub struct FetchRedditPostsNode {
    reddit: Arc<dyn RedditSource>,
}

impl FetchRedditPostsNode {
    pub fn new(reddit: Arc<dyn RedditSource>) -> Self {
        Self { reddit }
    }
}

#[async_trait]
impl Node<ResearchState> for FetchRedditPostsNode {
    fn id(&self) -> &str {
        FETCH_REDDIT_POSTS
    }

    async fn run(&self, state: Arc<ResearchState>) -> Result<ResearchUpdate, NodeError> {
        let urls = state.selected_reddit_urls.as_deref().unwrap_or_default();
        let posts = if urls.is_empty() {
            Vec::new()
        } else {
            info!(count = urls.len(), "Retrieving Reddit posts");
            match self.reddit.fetch_posts(urls).await {
                Ok(posts) => posts,
                Err(e) => {
                    warn!(error = %e, "Reddit post retrieval failed; continuing without posts");
                    Vec::new()
                }
            }
        };
        Ok(ResearchUpdate {
            reddit_post_data: Some(posts),
            ..Default::default()
        })
    }
}

/// Which source an [`AnalyzeNode`] covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSource {
    Google,
    Bing,
    Reddit,
}

/// LLM analysis of one source; writes `<source>_analysis`.
pub struct AnalyzeNode {
    source: AnalysisSource,
    llm: Arc<dyn LlmClient>,
}

impl AnalyzeNode {
    pub fn new(source: AnalysisSource, llm: Arc<dyn LlmClient>) -> Self {
        Self { source, llm }
    }
}

#[async_trait]
impl Node<ResearchState> for AnalyzeNode {
    fn id(&self) -> &str {
        match self.source {
            AnalysisSource::Google => ANALYZE_GOOGLE,
            AnalysisSource::Bing => ANALYZE_BING,
            AnalysisSource::Reddit => ANALYZE_REDDIT,
        }
    }

    async fn run(&self, state: Arc<ResearchState>) -> Result<ResearchUpdate, NodeError> {
        let question = &state.user_question;
        let prompt = match self.source {
            AnalysisSource::Google => {
                prompts::google_analysis(question, state.google_results.as_ref())
            }
            AnalysisSource::Bing => prompts::bing_analysis(question, state.bing_results.as_ref()),
            AnalysisSource::Reddit => prompts::reddit_analysis(
                question,
                state.reddit_results.as_ref(),
                state.reddit_post_data.as_deref(),
            ),
        };
        info!(source = ?self.source, "Analyzing results");
        let analysis = self.llm.complete(&prompt.system, &prompt.user).await?;

        let mut update = ResearchUpdate::default();
        match self.source {
            AnalysisSource::Google => update.google_analysis = Some(analysis),
            AnalysisSource::Bing => update.bing_analysis = Some(analysis),
            AnalysisSource::Reddit => update.reddit_analysis = Some(analysis),
        }
        Ok(update)
    }
}

/// Combines the analyses; writes `final_answer` and appends one assistant message.
pub struct SynthesizeNode {
    llm: Arc<dyn LlmClient>,
}

impl SynthesizeNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Node<ResearchState> for SynthesizeNode {
    fn id(&self) -> &str {
        SYNTHESIZE
    }

    async fn run(&self, state: Arc<ResearchState>) -> Result<ResearchUpdate, NodeError> {
        info!("Combining analyses");
        let prompt = prompts::synthesis(
            &state.user_question,
            state.google_analysis.as_deref(),
            state.bing_analysis.as_deref(),
            state.reddit_analysis.as_deref(),
        );
        let answer = self.llm.complete(&prompt.system, &prompt.user).await?;
        Ok(ResearchUpdate {
            messages: vec![Message::assistant(answer.clone())],
            final_answer: Some(answer),
            ..Default::default()
        })
    }
}
