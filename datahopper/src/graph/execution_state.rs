//! Per-run bookkeeping: node status, predecessor barriers, accumulated state.
//!
//! Owned by a single `Executor::run` call and dropped when it returns.

use std::sync::Arc;

use crate::channels::{NamedBarrierValue, Reducible};

use super::topology::Topology;

/// Lifecycle of one node within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    /// Waiting for at least one predecessor.
    Pending,
    /// All predecessors done; will run in the next wave.
    Ready,
    /// Spawned in the current wave.
    Running,
    /// Finished and its update has been merged.
    Done,
    /// Returned an error (or panicked).
    Failed,
}

pub(crate) struct ExecutionState<S> {
    status: Vec<NodeStatus>,
    barriers: Vec<NamedBarrierValue<usize>>,
    state: Arc<S>,
}

impl<S: Reducible> ExecutionState<S> {
    /// Entry nodes start Ready; everything else waits on its predecessors.
    pub(crate) fn new(topology: &Topology, initial: S) -> Self {
        let barriers: Vec<NamedBarrierValue<usize>> = topology
            .predecessors
            .iter()
            .map(|preds| NamedBarrierValue::from_names(preds.iter().copied()))
            .collect();
        let status = barriers
            .iter()
            .map(|b| {
                if b.is_available() {
                    NodeStatus::Ready
                } else {
                    NodeStatus::Pending
                }
            })
            .collect();
        Self {
            status,
            barriers,
            state: Arc::new(initial),
        }
    }

    /// Shared read-only view of the state as of the last merged wave.
    pub(crate) fn snapshot(&self) -> Arc<S> {
        Arc::clone(&self.state)
    }

    pub(crate) fn has_ready(&self) -> bool {
        self.status.contains(&NodeStatus::Ready)
    }

    /// Moves every Ready node to Running and returns them in index order.
    pub(crate) fn take_wave(&mut self) -> Vec<usize> {
        let mut wave = Vec::new();
        for (idx, status) in self.status.iter_mut().enumerate() {
            if *status == NodeStatus::Ready {
                *status = NodeStatus::Running;
                wave.push(idx);
            }
        }
        wave
    }

    pub(crate) fn mark_failed(&mut self, idx: usize) {
        self.status[idx] = NodeStatus::Failed;
    }

    /// Installs the merged state, marks `wave` Done and releases successors.
    pub(crate) fn commit(&mut self, topology: &Topology, wave: &[usize], merged: S) {
        self.state = Arc::new(merged);
        for &idx in wave {
            self.status[idx] = NodeStatus::Done;
        }
        for &idx in wave {
            for &succ in &topology.successors[idx] {
                self.barriers[succ].mark_seen(idx);
                if self.status[succ] == NodeStatus::Pending && self.barriers[succ].is_available()
                {
                    self.status[succ] = NodeStatus::Ready;
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn status(&self, idx: usize) -> NodeStatus {
        self.status[idx]
    }

    /// Indices of nodes that never finished.
    pub(crate) fn unfinished(&self) -> Vec<usize> {
        self.status
            .iter()
            .enumerate()
            .filter(|(_, s)| **s != NodeStatus::Done)
            .map(|(i, _)| i)
            .collect()
    }

    /// Final state. Clones only if a detached task still holds a snapshot.
    pub(crate) fn into_state(self) -> S {
        Arc::try_unwrap(self.state).unwrap_or_else(|shared| (*shared).clone())
    }
}
