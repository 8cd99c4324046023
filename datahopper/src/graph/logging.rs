//! Logging utilities for graph execution.
//!
//! Structured `tracing` events for the run lifecycle. Fields: `node_id`, `wave`,
//! `elapsed_ms`.

use super::run_error::RunError;

/// Log graph execution start.
pub fn log_graph_start(node_count: usize) {
    tracing::info!(node_count, "Starting graph execution");
}

/// Log the start of a wave.
pub fn log_wave_start(wave: usize, nodes: &[String]) {
    tracing::debug!(wave, ?nodes, "Starting wave");
}

/// Log node execution start.
pub fn log_node_start(wave: usize, node_id: &str) {
    tracing::debug!(wave, node_id, "Starting node execution");
}

/// Log node execution completion.
pub fn log_node_complete(wave: usize, node_id: &str, elapsed_ms: u64) {
    tracing::debug!(wave, node_id, elapsed_ms, "Node execution complete");
}

/// Log node execution failure.
pub fn log_node_failed(wave: usize, node_id: &str, error: &str) {
    tracing::warn!(wave, node_id, error, "Node execution failed");
}

/// Log graph execution completion.
pub fn log_graph_complete(waves: usize, elapsed_ms: u64) {
    tracing::info!(waves, elapsed_ms, "Graph execution complete");
}

/// Log graph execution error.
pub fn log_graph_error(error: &RunError) {
    tracing::error!(%error, "Graph execution error");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NodeError;

    #[test]
    fn test_logging_functions() {
        // These should not panic
        log_graph_start(2);
        log_wave_start(0, &["a".to_string()]);
        log_node_start(0, "a");
        log_node_complete(0, "a", 5);
        log_node_failed(0, "a", "boom");
        log_graph_complete(1, 5);
        log_graph_error(&RunError::NodeExecution {
            node: "a".into(),
            source: NodeError::ExecutionFailed("test".into()),
        });
    }
}
