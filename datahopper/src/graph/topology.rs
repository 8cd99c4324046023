//! Structural validation of a graph and precomputed adjacency.
//!
//! Operates on plain ids and edges so it can be run again on a compiled graph
//! (`CompiledStateGraph::validate`). Nodes are indexed by registration order.

use std::collections::{HashMap, HashSet, VecDeque};

use super::compile_error::ValidationError;
use super::state_graph::{END, START};

/// Adjacency of a validated DAG, by node index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Topology {
    /// Direct node predecessors (START excluded), sorted.
    pub(crate) predecessors: Vec<Vec<usize>>,
    /// Direct node successors (END excluded), sorted.
    pub(crate) successors: Vec<Vec<usize>>,
    /// Nodes with an edge from START.
    pub(crate) entries: Vec<usize>,
    /// Nodes with an edge to END.
    pub(crate) exits: Vec<usize>,
    /// One topological order; ties resolved by registration order.
    pub(crate) order: Vec<usize>,
}

/// Validates `ids` and `edges` and computes the adjacency.
///
/// Checks, in order: ids (unique, not reserved), edge endpoints, START/END presence,
/// acyclicity, forward reachability from START, backward reachability from END.
pub(crate) fn analyze(
    ids: &[String],
    edges: &[(String, String)],
) -> Result<Topology, ValidationError> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(ids.len());
    for (i, id) in ids.iter().enumerate() {
        if id == START || id == END {
            return Err(ValidationError::ReservedName(id.clone()));
        }
        if index.insert(id.as_str(), i).is_some() {
            return Err(ValidationError::DuplicateNode(id.clone()));
        }
    }

    let n = ids.len();
    let mut predecessors = vec![Vec::new(); n];
    let mut successors = vec![Vec::new(); n];
    let mut entries = Vec::new();
    let mut exits = Vec::new();
    let mut seen_edges: HashSet<(&str, &str)> = HashSet::new();

    for (from, to) in edges {
        let invalid = |reason: &'static str| ValidationError::InvalidEdge {
            from: from.clone(),
            to: to.clone(),
            reason,
        };
        if from == END {
            return Err(invalid("END cannot be a source"));
        }
        if to == START {
            return Err(invalid("START cannot be a target"));
        }
        if from == START && to == END {
            return Err(invalid("START cannot connect directly to END"));
        }
        if !seen_edges.insert((from.as_str(), to.as_str())) {
            return Err(ValidationError::DuplicateEdge {
                from: from.clone(),
                to: to.clone(),
            });
        }

        let from_idx = if from == START {
            None
        } else {
            Some(
                *index
                    .get(from.as_str())
                    .ok_or_else(|| ValidationError::NodeNotFound(from.clone()))?,
            )
        };
        let to_idx = if to == END {
            None
        } else {
            Some(
                *index
                    .get(to.as_str())
                    .ok_or_else(|| ValidationError::NodeNotFound(to.clone()))?,
            )
        };

        match (from_idx, to_idx) {
            (None, Some(t)) => entries.push(t),
            (Some(f), None) => exits.push(f),
            (Some(f), Some(t)) => {
                if f == t {
                    return Err(ValidationError::Cycle(from.clone()));
                }
                successors[f].push(t);
                predecessors[t].push(f);
            }
            (None, None) => unreachable!("START -> END rejected above"),
        }
    }

    if entries.is_empty() {
        return Err(ValidationError::MissingStart);
    }
    if exits.is_empty() {
        return Err(ValidationError::MissingEnd);
    }

    for list in predecessors.iter_mut().chain(successors.iter_mut()) {
        list.sort_unstable();
    }
    entries.sort_unstable();
    exits.sort_unstable();

    let order = topological_order(&predecessors, &successors)
        .map_err(|idx| ValidationError::Cycle(ids[idx].clone()))?;

    let forward = reach(&entries, &successors, n);
    if let Some(idx) = (0..n).find(|&i| !forward[i]) {
        return Err(ValidationError::Unreachable(ids[idx].clone()));
    }
    let backward = reach(&exits, &predecessors, n);
    if let Some(idx) = (0..n).find(|&i| !backward[i]) {
        return Err(ValidationError::DeadEnd(ids[idx].clone()));
    }

    Ok(Topology {
        predecessors,
        successors,
        entries,
        exits,
        order,
    })
}

/// Kahn's algorithm. On failure returns the index of a node lying on a cycle.
fn topological_order(
    predecessors: &[Vec<usize>],
    successors: &[Vec<usize>],
) -> Result<Vec<usize>, usize> {
    let n = predecessors.len();
    let mut indegree: Vec<usize> = predecessors.iter().map(Vec::len).collect();
    let mut queue: VecDeque<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);

    while let Some(node) = queue.pop_front() {
        order.push(node);
        for &succ in &successors[node] {
            indegree[succ] -= 1;
            if indegree[succ] == 0 {
                queue.push_back(succ);
            }
        }
    }

    if order.len() == n {
        return Ok(order);
    }

    // Every unordered node keeps an unordered predecessor, so walking predecessors
    // from any of them must revisit a node; the first revisit is on a cycle.
    let ordered: HashSet<usize> = order.into_iter().collect();
    let mut current = (0..n).find(|i| !ordered.contains(i)).unwrap_or(0);
    let mut visited = HashSet::new();
    while visited.insert(current) {
        match predecessors[current].iter().find(|p| !ordered.contains(p)) {
            Some(&p) => current = p,
            None => break,
        }
    }
    Err(current)
}

fn reach(starts: &[usize], adjacency: &[Vec<usize>], n: usize) -> Vec<bool> {
    let mut seen = vec![false; n];
    let mut stack: Vec<usize> = starts.to_vec();
    while let Some(node) = stack.pop() {
        if seen[node] {
            continue;
        }
        seen[node] = true;
        stack.extend(adjacency[node].iter().copied().filter(|&m| !seen[m]));
    }
    seen
}
