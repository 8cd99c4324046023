//! Wave-based concurrent executor.
//!
//! Each wave is the set of Ready nodes. Every member gets the same `Arc<S>`
//! snapshot and runs in its own tokio task; the executor waits for the whole wave
//! (in completion order), merges the updates with the state's reducer, and then
//! releases the successors whose predecessors are all Done.
//!
//! The first failed member stops the run. Siblings already spawned keep running
//! detached and their results are dropped; nothing from the failing wave is merged.

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{mpsc, Semaphore};

use crate::channels::{merge, Reducible};
use crate::error::NodeError;
use crate::stream::RunEvent;

use super::compiled::CompiledStateGraph;
use super::execution_state::ExecutionState;
use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_failed,
    log_node_start, log_wave_start,
};
use super::run_error::RunError;

/// Runs compiled graphs. Cheap to clone; holds no per-run state.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    max_concurrency: Option<usize>,
    events: Option<mpsc::Sender<RunEvent>>,
}

impl Executor {
    /// Unbounded executor without event output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps how many node bodies run at the same time (minimum 1).
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit.max(1));
        self
    }

    /// Emits a [`RunEvent`] for every lifecycle step to `tx`.
    pub fn with_event_sender(mut self, tx: mpsc::Sender<RunEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency
    }

    /// Runs `graph` from `initial` to completion and returns the final state.
    pub async fn run<S: Reducible>(
        &self,
        graph: &CompiledStateGraph<S>,
        initial: S,
    ) -> Result<S, RunError> {
        let run_started = Instant::now();
        log_graph_start(graph.node_count());

        let topology = graph.topology();
        let mut exec = ExecutionState::new(topology, initial);
        let semaphore = self.max_concurrency.map(|n| Arc::new(Semaphore::new(n)));
        let mut wave_no = 0usize;

        while exec.has_ready() {
            let wave = exec.take_wave();
            let names: Vec<String> = wave
                .iter()
                .map(|&idx| graph.node_ids()[idx].clone())
                .collect();
            log_wave_start(wave_no, &names);
            self.emit(RunEvent::WaveStart {
                wave: wave_no,
                nodes: names.clone(),
            })
            .await;

            let snapshot = exec.snapshot();
            let mut in_flight = FuturesUnordered::new();
            for (&idx, name) in wave.iter().zip(&names) {
                log_node_start(wave_no, name);
                self.emit(RunEvent::NodeStart {
                    wave: wave_no,
                    node: name.clone(),
                })
                .await;

                let node = graph.node_at(idx);
                let state = Arc::clone(&snapshot);
                let gate = semaphore.clone();
                let handle = tokio::spawn(async move {
                    let _permit = match gate {
                        Some(gate) => match gate.acquire_owned().await {
                            Ok(permit) => Some(permit),
                            Err(e) => return (Err(NodeError::ExecutionFailed(e.to_string())), 0),
                        },
                        None => None,
                    };
                    let started = Instant::now();
                    let result = node.run(state).await;
                    (result, started.elapsed().as_millis() as u64)
                });
                in_flight.push(async move { (idx, handle.await) });
            }

            let mut updates = Vec::with_capacity(wave.len());
            while let Some((idx, joined)) = in_flight.next().await {
                let name = graph.node_ids()[idx].clone();
                let outcome = match joined {
                    Ok((Ok(update), elapsed_ms)) => Ok((update, elapsed_ms)),
                    Ok((Err(e), _)) => Err(e),
                    Err(join_err) => Err(NodeError::ExecutionFailed(format!(
                        "node task panicked: {}",
                        join_err
                    ))),
                };
                match outcome {
                    Ok((update, elapsed_ms)) => {
                        log_node_complete(wave_no, &name, elapsed_ms);
                        self.emit(RunEvent::NodeComplete {
                            wave: wave_no,
                            node: name.clone(),
                            elapsed_ms,
                        })
                        .await;
                        updates.push((name, update));
                    }
                    Err(source) => {
                        exec.mark_failed(idx);
                        let message = source.to_string();
                        log_node_failed(wave_no, &name, &message);
                        self.emit(RunEvent::NodeFailed {
                            wave: wave_no,
                            node: name.clone(),
                            error: message,
                        })
                        .await;
                        let err = RunError::NodeExecution { node: name, source };
                        log_graph_error(&err);
                        return Err(err);
                    }
                }
            }

            let merged = match merge(snapshot.as_ref(), updates) {
                Ok(merged) => merged,
                Err(e) => {
                    let err = RunError::from(e);
                    log_graph_error(&err);
                    return Err(err);
                }
            };
            drop(snapshot);
            exec.commit(topology, &wave, merged);
            wave_no += 1;
        }

        let unfinished = exec.unfinished();
        if !unfinished.is_empty() {
            let err = RunError::Incomplete {
                pending: unfinished
                    .into_iter()
                    .map(|idx| graph.node_ids()[idx].clone())
                    .collect(),
            };
            log_graph_error(&err);
            return Err(err);
        }

        log_graph_complete(wave_no, run_started.elapsed().as_millis() as u64);
        self.emit(RunEvent::RunComplete { waves: wave_no }).await;
        Ok(exec.into_state())
    }

    async fn emit(&self, event: RunEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event).await;
        }
    }
}
