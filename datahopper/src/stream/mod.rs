//! Run progress events.
//!
//! An [`Executor`](crate::graph::Executor) configured with `with_event_sender` emits
//! one [`RunEvent`] per lifecycle step. Events are sent with `send().await`, so a
//! slow consumer applies backpressure to the run; a dropped receiver is ignored.
//!
//! ```rust,ignore
//! let (tx, mut rx) = tokio::sync::mpsc::channel(64);
//! let executor = Executor::new().with_event_sender(tx);
//! tokio::spawn(async move {
//!     while let Some(event) = rx.recv().await {
//!         println!("{}", serde_json::to_string(&event).unwrap());
//!     }
//! });
//! ```

use serde::{Deserialize, Serialize};

/// One step of a graph run. Serialized with a `type` tag in snake_case, e.g.
/// `{"type":"node_complete","wave":1,"node":"search-google","elapsed_ms":412}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    /// A wave is about to be spawned. `nodes` is in registration order.
    WaveStart { wave: usize, nodes: Vec<String> },
    /// A node task has been spawned.
    NodeStart { wave: usize, node: String },
    /// A node returned an update.
    NodeComplete {
        wave: usize,
        node: String,
        elapsed_ms: u64,
    },
    /// A node returned an error; the run stops after this event.
    NodeFailed {
        wave: usize,
        node: String,
        error: String,
    },
    /// Every node finished and the final state is available.
    RunComplete { waves: usize },
}

impl RunEvent {
    /// Node the event is about, if any.
    pub fn node(&self) -> Option<&str> {
        match self {
            RunEvent::NodeStart { node, .. }
            | RunEvent::NodeComplete { node, .. }
            | RunEvent::NodeFailed { node, .. } => Some(node),
            RunEvent::WaveStart { .. } | RunEvent::RunComplete { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Events carry a snake_case `type` tag on the wire.
    #[test]
    fn run_event_serializes_with_type_tag() {
        let json = serde_json::to_value(RunEvent::NodeComplete {
            wave: 2,
            node: "synthesize".into(),
            elapsed_ms: 12,
        })
        .unwrap();
        assert_eq!(json["type"], "node_complete");
        assert_eq!(json["node"], "synthesize");
        assert_eq!(json["elapsed_ms"], 12);

        let start = serde_json::to_value(RunEvent::WaveStart {
            wave: 0,
            nodes: vec!["a".into()],
        })
        .unwrap();
        assert_eq!(start["type"], "wave_start");
    }

    /// **Scenario**: node() returns the subject only for per-node events.
    #[test]
    fn run_event_node_accessor() {
        assert_eq!(
            RunEvent::NodeStart {
                wave: 0,
                node: "x".into()
            }
            .node(),
            Some("x")
        );
        assert_eq!(RunEvent::RunComplete { waves: 3 }.node(), None);
    }
}
