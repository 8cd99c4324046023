//! State graph: nodes + explicit edges (from → to), compiled into a validated DAG.
//!
//! Add nodes with `add_node`, define dependencies with `add_edge(from, to)` using
//! `START` and `END` for graph entry/exit. A node with several incoming edges waits
//! for all of its predecessors (fan-in); a node with several outgoing edges releases
//! all of its successors at once (fan-out). Then `compile` to get a
//! [`CompiledStateGraph`].

use std::sync::Arc;

use crate::channels::Reducible;
use crate::graph::compile_error::ValidationError;
use crate::graph::compiled::CompiledStateGraph;
use crate::graph::node::Node;
use crate::graph::topology;

/// Sentinel for graph entry: use as `from_id` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as `to_id` in `add_edge(last_node_id, END)`.
pub const END: &str = "__end__";

/// State graph builder: nodes plus explicit dependency edges.
///
/// Generic over state type `S`. Nodes keep their registration order; that order
/// is the tie-break everywhere the executor has to pick one (wave membership,
/// merge ties, topological order).
///
/// **Interaction**: Accepts `Arc<dyn Node<S>>`; produces `CompiledStateGraph<S>`.
pub struct StateGraph<S> {
    nodes: Vec<(String, Arc<dyn Node<S>>)>,
    /// Edges (from_id, to_id) in insertion order.
    edges: Vec<(String, String)>,
}

impl<S: Reducible> Default for StateGraph<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Reducible> StateGraph<S> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Adds a node under `id`. Duplicates and reserved ids are reported by `compile`.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        self.nodes.push((id.into(), node));
        self
    }

    /// Adds a dependency edge: `to` cannot start before `from` is done.
    ///
    /// Use `START` as `from` for entry nodes and `END` as `to` for terminal producers.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.edges.push((from.into(), to.into()));
        self
    }

    /// Validates the structure and freezes it.
    ///
    /// Fails with a [`ValidationError`] naming the offending node or edge.
    pub fn compile(self) -> Result<CompiledStateGraph<S>, ValidationError> {
        let ids: Vec<String> = self.nodes.iter().map(|(id, _)| id.clone()).collect();
        let topology = topology::analyze(&ids, &self.edges)?;
        let nodes = self.nodes.into_iter().map(|(_, node)| node).collect();
        Ok(CompiledStateGraph::from_parts(
            ids,
            nodes,
            self.edges,
            topology,
        ))
    }
}
