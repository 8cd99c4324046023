//! # DataHopper
//!
//! Multi-source research in Rust: a question fans out to Google, Bing and Reddit
//! searches, each source is analysed by a language model, and the analyses are
//! synthesised into one answer.
//!
//! The engine underneath is a small dependency-graph executor with a
//! **snapshot-in, update-out** design: every node reads an `Arc` snapshot of one
//! shared state type and returns a partial update that the executor merges with
//! the state's per-field policy.
//!
//! ## Design principles
//!
//! - **Static state record**: the shared state (e.g. [`ResearchState`]) declares one
//!   merge policy per field through [`Reducible`]; partial updates are a separate
//!   type ([`ResearchUpdate`]).
//! - **Waves**: every node whose predecessors are Done runs in the same wave, each in
//!   its own tokio task, all against the same snapshot.
//! - **Fail fast**: the first failing node ends the run; no partial answer is returned.
//! - **Validated once, shared everywhere**: [`StateGraph::compile`] rejects malformed
//!   graphs; the resulting [`CompiledStateGraph`] is immutable and shared across runs.
//!
//! ## Main modules
//!
//! - [`graph`]: [`StateGraph`], [`CompiledStateGraph`], [`Node`], [`Executor`], [`RunError`],
//!   [`ValidationError`], [`generate_dot`], [`generate_text`].
//! - [`channels`]: [`Reducible`], [`merge`], [`MergePolicy`], [`NamedBarrierValue`].
//! - [`state`]: [`ResearchState`], [`ResearchUpdate`].
//! - [`research`]: the research graph, its nodes, prompts and [`ResearchRunner`].
//! - [`llm`]: [`LlmClient`] trait, [`MockLlm`], [`ChatOpenAI`].
//! - [`search`]: [`SearchProvider`], [`RedditSource`] and their HTTP clients and mocks.
//! - [`stream`]: [`RunEvent`] progress events.
//! - [`settings`]: [`ResearchSettings`] read from the environment.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use datahopper::{ResearchDeps, ResearchRunner};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let runner = ResearchRunner::new(ResearchDeps::offline()).expect("valid graph");
//! match runner.research("Which e-reader has the best battery life?").await {
//!     Ok(outcome) => println!("{}", outcome.final_answer),
//!     Err(e) => eprintln!("error: {}", e),
//! }
//! # }
//! ```

pub mod channels;
pub mod error;
pub mod graph;
pub mod llm;
pub mod message;
pub mod research;
pub mod search;
pub mod settings;
pub mod state;
pub mod stream;

pub use channels::{
    merge, AggregationError, FieldWrite, MergePolicy, NamedBarrierValue, Reducible, WaveWrites,
};
pub use error::NodeError;
pub use graph::{
    generate_dot, generate_text, CompiledStateGraph, Executor, FnNode, NameNode, Node,
    NodeStatus, RunError, StateGraph, ValidationError, END, START,
};
pub use llm::{ChatOpenAI, LlmClient, LlmResponse, LlmUsage, MockLlm};
pub use message::Message;
pub use research::{
    build_research_graph, BuildError, PromptPair, ResearchDeps, ResearchError, ResearchOutcome,
    ResearchRunner,
};
pub use search::{
    MockRedditSource, MockSearchProvider, RedditJsonClient, RedditSource, SearchEngine,
    SearchProvider, SerpApiClient,
};
pub use settings::ResearchSettings;
pub use state::{ResearchState, ResearchUpdate};
pub use stream::RunEvent;

/// When running `cargo test -p datahopper`, initializes tracing from `RUST_LOG` so that
/// unit tests in `src/**` can print logs with `--nocapture`.
#[cfg(test)]
mod test_logging {
    use ctor::ctor;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::Layer;

    #[ctor]
    fn init() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_filter(filter),
            )
            .try_init();
    }
}
