//! Graph validation error.
//!
//! Returned by `StateGraph::compile` (and `CompiledStateGraph::validate`) when the
//! declared nodes and edges do not form a DAG running from START to END.

use thiserror::Error;

/// Error when compiling a state graph. Always names the offending node or edge.
///
/// Compilation failure is fatal at startup: nothing should serve requests with a
/// graph that did not validate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A node id was registered twice.
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    /// A node was registered under START or END.
    #[error("node id is reserved for a graph marker: {0}")]
    ReservedName(String),

    /// A node id in an edge was not registered via `add_node` (and is not START/END).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// Edge uses a marker on the wrong side, or connects START straight to END.
    #[error("invalid edge {from} -> {to}: {reason}")]
    InvalidEdge {
        from: String,
        to: String,
        reason: &'static str,
    },

    /// The same edge was added twice.
    #[error("duplicate edge {from} -> {to}")]
    DuplicateEdge { from: String, to: String },

    /// No edge leaves START.
    #[error("graph must have at least one edge from START")]
    MissingStart,

    /// No edge enters END.
    #[error("graph must have at least one edge to END")]
    MissingEnd,

    /// Topological sort could not order every node; the id is a node on a cycle.
    #[error("cycle detected at node: {0}")]
    Cycle(String),

    /// Node cannot be reached from START.
    #[error("node not reachable from START: {0}")]
    Unreachable(String),

    /// END cannot be reached from the node.
    #[error("node does not lead to END: {0}")]
    DeadEnd(String),
}
