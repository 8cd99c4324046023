//! Multi-source research pipeline.
//!
//! Three searches run concurrently, join at URL selection, fan out again into
//! three analyses after post retrieval, and join at synthesis:
//!
//! ```text
//! START -> {search-google, search-bing, search-reddit}
//!       -> select-reddit-urls -> fetch-reddit-posts
//!       -> {analyze-google, analyze-bing, analyze-reddit}
//!       -> synthesize -> END
//! ```

mod error;
mod nodes;
pub mod prompts;
mod runner;
pub mod url_selection;

pub use error::{BuildError, ResearchError};
pub use nodes::{
    AnalysisSource, AnalyzeNode, FetchRedditPostsNode, RedditSearchNode, SearchNode,
    SelectRedditUrlsNode, SynthesizeNode,
};
pub use prompts::PromptPair;
pub use runner::{ResearchOutcome, ResearchRunner, NO_ANSWER};

use std::sync::Arc;

use crate::graph::{CompiledStateGraph, StateGraph, ValidationError, END, START};
use crate::llm::{LlmClient, MockLlm};
use crate::search::{
    MockRedditSource, MockSearchProvider, RedditSource, SearchEngine, SearchProvider,
};
use crate::state::ResearchState;

pub const SEARCH_GOOGLE: &str = "search-google";
pub const SEARCH_BING: &str = "search-bing";
pub const SEARCH_REDDIT: &str = "search-reddit";
pub const SELECT_REDDIT_URLS: &str = "select-reddit-urls";
pub const FETCH_REDDIT_POSTS: &str = "fetch-reddit-posts";
pub const ANALYZE_GOOGLE: &str = "analyze-google";
pub const ANALYZE_BING: &str = "analyze-bing";
pub const ANALYZE_REDDIT: &str = "analyze-reddit";
pub const SYNTHESIZE: &str = "synthesize";

/// External collaborators of the research nodes.
#[derive(Clone)]
pub struct ResearchDeps {
    pub search: Arc<dyn SearchProvider>,
    pub reddit: Arc<dyn RedditSource>,
    pub llm: Arc<dyn LlmClient>,
}

impl ResearchDeps {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        reddit: Arc<dyn RedditSource>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            search,
            reddit,
            llm,
        }
    }

    /// Canned collaborators: no network, no credentials.
    pub fn offline() -> Self {
        Self::new(
            Arc::new(MockSearchProvider::default()),
            Arc::new(MockRedditSource::default()),
            Arc::new(MockLlm::with_reply(
                "Offline mode: no language model is configured, so this is a placeholder answer.",
            )),
        )
    }
}

/// Builds and validates the research graph. Nodes are registered in the order of
/// the constants above; that order breaks ties inside a wave.
pub fn build_research_graph(
    deps: &ResearchDeps,
) -> Result<CompiledStateGraph<ResearchState>, ValidationError> {
    let mut graph = StateGraph::<ResearchState>::new();
    graph
        .add_node(
            SEARCH_GOOGLE,
            Arc::new(SearchNode::new(SearchEngine::Google, deps.search.clone())),
        )
        .add_node(
            SEARCH_BING,
            Arc::new(SearchNode::new(SearchEngine::Bing, deps.search.clone())),
        )
        .add_node(
            SEARCH_REDDIT,
            Arc::new(RedditSearchNode::new(deps.reddit.clone())),
        )
        .add_node(
            SELECT_REDDIT_URLS,
            Arc::new(SelectRedditUrlsNode::new(deps.llm.clone())),
        )
        .add_node(
            FETCH_REDDIT_POSTS,
            Arc::new(FetchRedditPostsNode::new(deps.reddit.clone())),
        )
        .add_node(
            ANALYZE_GOOGLE,
            Arc::new(AnalyzeNode::new(AnalysisSource::Google, deps.llm.clone())),
        )
        .add_node(
            ANALYZE_BING,
            Arc::new(AnalyzeNode::new(AnalysisSource::Bing, deps.llm.clone())),
        )
        .add_node(
            ANALYZE_REDDIT,
            Arc::new(AnalyzeNode::new(AnalysisSource::Reddit, deps.llm.clone())),
        )
        .add_node(SYNTHESIZE, Arc::new(SynthesizeNode::new(deps.llm.clone())));

    for search in [SEARCH_GOOGLE, SEARCH_BING, SEARCH_REDDIT] {
        graph.add_edge(START, search);
        graph.add_edge(search, SELECT_REDDIT_URLS);
    }
    graph.add_edge(SELECT_REDDIT_URLS, FETCH_REDDIT_POSTS);
    for analysis in [ANALYZE_GOOGLE, ANALYZE_BING, ANALYZE_REDDIT] {
        graph.add_edge(FETCH_REDDIT_POSTS, analysis);
        graph.add_edge(analysis, SYNTHESIZE);
    }
    graph.add_edge(SYNTHESIZE, END);

    graph.compile()
}
