//! Graph node trait: one unit of work in a StateGraph.
//!
//! Receives a read-only snapshot of the shared state, returns a partial update.
//! Used by `StateGraph` and `Executor`. Node signature `(snapshot) -> partial`.

use async_trait::async_trait;
use std::sync::Arc;

use crate::channels::Reducible;
use crate::error::NodeError;

/// One step in a graph: snapshot in, partial update out.
///
/// The snapshot is shared with every other node of the same wave and is never
/// mutated; a node only influences the state through the update it returns, which
/// the executor folds in with the state's per-field merge policy once the whole
/// wave has finished.
///
/// **Interaction**: Registered with `StateGraph::add_node`; run by `Executor::run`
/// inside its own tokio task.
#[async_trait]
pub trait Node<S>: Send + Sync
where
    S: Reducible,
{
    /// Node id (e.g. `"search-google"`). Should match the id it is registered under.
    fn id(&self) -> &str;

    /// Runs the node against `state` and returns the fields it writes.
    async fn run(&self, state: Arc<S>) -> Result<S::Update, NodeError>;
}
