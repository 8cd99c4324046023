//! Run failure returned by `Executor::run`.

use thiserror::Error;

use crate::channels::AggregationError;
use crate::error::NodeError;

/// Why a graph run did not produce a final state.
#[derive(Debug, Error)]
pub enum RunError {
    /// A node returned an error or its task panicked. The run stopped at that wave.
    #[error("node {node} failed: {source}")]
    NodeExecution {
        node: String,
        #[source]
        source: NodeError,
    },

    /// A wave's updates could not be merged.
    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    /// No node is Ready but some predecessor of END never finished.
    #[error("run ended with unfinished nodes: {}", pending.join(", "))]
    Incomplete { pending: Vec<String> },
}

impl RunError {
    /// Id of the node that failed, when the error came from one.
    pub fn failed_node(&self) -> Option<&str> {
        match self {
            RunError::NodeExecution { node, .. } => Some(node),
            _ => None,
        }
    }
}
