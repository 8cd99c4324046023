//! Compiled state graph: immutable, validated DAG indexed by registration order.
//!
//! Built by `StateGraph::compile`. Holds the nodes, the raw edges and the
//! precomputed adjacency. Shared read-only (`Arc`) across concurrent runs.

use std::collections::HashMap;
use std::sync::Arc;

use crate::channels::Reducible;

use super::compile_error::ValidationError;
use super::executor::Executor;
use super::node::Node;
use super::run_error::RunError;
use super::topology::{self, Topology};

/// Compiled graph: immutable structure, run with an [`Executor`].
///
/// Node ids map to stable integer indices (their registration order); every
/// adjacency query below is answered from tables built once at compile time.
pub struct CompiledStateGraph<S> {
    ids: Vec<String>,
    nodes: Vec<Arc<dyn Node<S>>>,
    index: HashMap<String, usize>,
    edges: Vec<(String, String)>,
    topology: Topology,
}

impl<S> Clone for CompiledStateGraph<S> {
    fn clone(&self) -> Self {
        Self {
            ids: self.ids.clone(),
            nodes: self.nodes.clone(),
            index: self.index.clone(),
            edges: self.edges.clone(),
            topology: self.topology.clone(),
        }
    }
}

impl<S> std::fmt::Debug for CompiledStateGraph<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledStateGraph")
            .field("nodes", &self.ids)
            .field("edges", &self.edges)
            .finish()
    }
}

impl<S: Reducible> CompiledStateGraph<S> {
    pub(super) fn from_parts(
        ids: Vec<String>,
        nodes: Vec<Arc<dyn Node<S>>>,
        edges: Vec<(String, String)>,
        topology: Topology,
    ) -> Self {
        let index = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Self {
            ids,
            nodes,
            index,
            edges,
            topology,
        }
    }

    /// Re-runs structural validation on the stored nodes and edges.
    ///
    /// A compiled graph always passes; calling this any number of times is a no-op.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let topology = topology::analyze(&self.ids, &self.edges)?;
        debug_assert_eq!(topology, self.topology);
        Ok(())
    }

    /// Runs the graph once with a default (unbounded, silent) executor.
    pub async fn invoke(&self, state: S) -> Result<S, RunError> {
        Executor::new().run(self, state).await
    }

    /// Number of declared nodes (markers excluded).
    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Node ids in registration order.
    pub fn node_ids(&self) -> &[String] {
        &self.ids
    }

    /// Node id for an index.
    pub fn node_id(&self, idx: usize) -> Option<&str> {
        self.ids.get(idx).map(String::as_str)
    }

    /// Index of a node id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Direct predecessors of `id` (START excluded), in registration order.
    pub fn predecessors(&self, id: &str) -> Vec<&str> {
        self.index_of(id)
            .map(|i| self.names(&self.topology.predecessors[i]))
            .unwrap_or_default()
    }

    /// Direct successors of `id` (END excluded), in registration order.
    pub fn successors(&self, id: &str) -> Vec<&str> {
        self.index_of(id)
            .map(|i| self.names(&self.topology.successors[i]))
            .unwrap_or_default()
    }

    /// Nodes with an edge from START.
    pub fn entry_nodes(&self) -> Vec<&str> {
        self.names(&self.topology.entries)
    }

    /// Nodes with an edge to END.
    pub fn terminal_predecessors(&self) -> Vec<&str> {
        self.names(&self.topology.exits)
    }

    /// One topological order of the nodes.
    pub fn topological_order(&self) -> Vec<&str> {
        self.names(&self.topology.order)
    }

    /// Waves the executor would run if every node succeeds: a node's wave is one
    /// more than the latest wave among its predecessors.
    pub fn wave_plan(&self) -> Vec<Vec<&str>> {
        let mut layer = vec![0usize; self.ids.len()];
        for &node in &self.topology.order {
            layer[node] = self.topology.predecessors[node]
                .iter()
                .map(|&p| layer[p] + 1)
                .max()
                .unwrap_or(0);
        }
        let depth = layer.iter().copied().max().map_or(0, |d| d + 1);
        let mut waves = vec![Vec::new(); depth];
        for (idx, &l) in layer.iter().enumerate() {
            waves[l].push(self.ids[idx].as_str());
        }
        waves
    }

    /// Edges as declared, including the START/END markers.
    pub fn edges(&self) -> &[(String, String)] {
        &self.edges
    }

    pub(super) fn node_at(&self, idx: usize) -> Arc<dyn Node<S>> {
        Arc::clone(&self.nodes[idx])
    }

    pub(super) fn topology(&self) -> &Topology {
        &self.topology
    }

    fn names(&self, indices: &[usize]) -> Vec<&str> {
        indices.iter().map(|&i| self.ids[i].as_str()).collect()
    }
}
