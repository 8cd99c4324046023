//! Node execution error types.
//!
//! Returned by `Node::run` and by every collaborator a node calls (search providers,
//! Reddit retrieval, LLM clients). The executor wraps it with the failing node's id
//! in [`RunError::NodeExecution`](crate::graph::RunError).

use thiserror::Error;

/// Failure inside a node or one of its external calls.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Execution failed with a message (e.g. LLM call failed, task panicked).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// An HTTP request to an external provider failed (transport or non-success status).
    #[error("http request failed: {0}")]
    Http(String),

    /// The provider answered but the payload could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for NodeError {
    fn from(err: reqwest::Error) -> Self {
        NodeError::Http(err.to_string())
    }
}
