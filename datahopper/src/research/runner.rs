//! Research runner: one compiled graph, many requests.

use std::sync::Arc;

use async_openai::config::OpenAIConfig;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::graph::{CompiledStateGraph, Executor, ValidationError};
use crate::llm::ChatOpenAI;
use crate::search::{RedditJsonClient, SerpApiClient};
use crate::settings::ResearchSettings;
use crate::state::ResearchState;
use crate::stream::RunEvent;

use super::{build_research_graph, BuildError, ResearchDeps, ResearchError};

/// Answer used when a run completes without writing `final_answer`.
pub const NO_ANSWER: &str = "No answer generated";

/// Result of one research request.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchOutcome {
    pub final_answer: String,
    pub google_results: Option<Value>,
    pub bing_results: Option<Value>,
    pub reddit_results: Option<Value>,
    /// Full final state, for callers that need more than the answer.
    #[serde(skip)]
    pub state: ResearchState,
}

impl From<ResearchState> for ResearchOutcome {
    fn from(state: ResearchState) -> Self {
        Self {
            final_answer: state
                .final_answer
                .clone()
                .unwrap_or_else(|| NO_ANSWER.to_string()),
            google_results: state.google_results.clone(),
            bing_results: state.bing_results.clone(),
            reddit_results: state.reddit_results.clone(),
            state,
        }
    }
}

/// Holds the validated research graph and the executor configuration.
///
/// Cheap to clone; the graph is shared read-only between concurrent requests and
/// every request gets its own state.
#[derive(Clone)]
pub struct ResearchRunner {
    graph: Arc<CompiledStateGraph<ResearchState>>,
    executor: Executor,
}

impl ResearchRunner {
    /// Builds the graph over `deps` with an unbounded executor.
    pub fn new(deps: ResearchDeps) -> Result<Self, ValidationError> {
        Ok(Self {
            graph: Arc::new(build_research_graph(&deps)?),
            executor: Executor::new(),
        })
    }

    /// Wires the real clients (SerpAPI, Reddit JSON, OpenAI-compatible chat) from settings.
    pub fn from_settings(settings: &ResearchSettings) -> Result<Self, BuildError> {
        let openai_key = settings
            .openai_api_key
            .clone()
            .ok_or(BuildError::MissingCredential("OPENAI_API_KEY"))?;
        let serpapi_key = settings
            .serpapi_api_key
            .clone()
            .ok_or(BuildError::MissingCredential("SERPAPI_API_KEY"))?;

        let http = reqwest::Client::builder()
            .timeout(settings.http_timeout)
            .user_agent(settings.user_agent.clone())
            .build()?;

        let mut config = OpenAIConfig::new().with_api_key(openai_key);
        if let Some(base) = &settings.openai_base_url {
            config = config.with_api_base(base.clone());
        }

        let deps = ResearchDeps::new(
            Arc::new(SerpApiClient::with_client(
                serpapi_key,
                settings.serpapi_base_url.clone(),
                http.clone(),
            )),
            Arc::new(
                RedditJsonClient::with_base_url(settings.reddit_base_url.clone(), http)
                    .with_search_limit(settings.reddit_search_limit)
                    .with_comment_limit(settings.reddit_comment_limit),
            ),
            Arc::new(ChatOpenAI::with_config(config, settings.model.clone())),
        );

        let mut runner = Self::new(deps)?;
        if let Some(limit) = settings.max_concurrency {
            runner = runner.with_executor(Executor::new().with_max_concurrency(limit));
        }
        Ok(runner)
    }

    /// Replaces the executor (concurrency bound, event sender).
    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = executor;
        self
    }

    pub fn graph(&self) -> &CompiledStateGraph<ResearchState> {
        &self.graph
    }

    /// Answers `question`. Blank questions are rejected before any node runs; any other
    /// question is stored as received.
    pub async fn research(&self, question: &str) -> Result<ResearchOutcome, ResearchError> {
        self.run_with(&self.executor, question).await
    }

    /// Like [`research`](Self::research), additionally streaming [`RunEvent`]s to `events`.
    pub async fn research_with_events(
        &self,
        question: &str,
        events: mpsc::Sender<RunEvent>,
    ) -> Result<ResearchOutcome, ResearchError> {
        let executor = self.executor.clone().with_event_sender(events);
        self.run_with(&executor, question).await
    }

    async fn run_with(
        &self,
        executor: &Executor,
        question: &str,
    ) -> Result<ResearchOutcome, ResearchError> {
        if question.trim().is_empty() {
            return Err(ResearchError::EmptyQuestion);
        }
        tracing::info!(question, "Starting research");
        let state = executor
            .run(&self.graph, ResearchState::new(question))
            .await?;
        Ok(ResearchOutcome::from(state))
    }
}
