//! Executor integration tests: ordering, fan-in/fan-out, merge, concurrency bound,
//! fail-fast and events.

mod common;

use common::{Action, Probe, ProbeNode, Recorder};
use datahopper::{
    AggregationError, CompiledStateGraph, Executor, RunError, RunEvent, StateGraph, END, START,
};
use tokio::sync::mpsc;

/// START -> root -> {left, right} -> join -> END
fn diamond(recorder: &std::sync::Arc<Recorder>, left_ms: u64, right_ms: u64) -> CompiledStateGraph<Probe> {
    let mut graph = StateGraph::<Probe>::new();
    graph
        .add_node("root", ProbeNode::new("root", 0, Action::Log, recorder))
        .add_node("left", ProbeNode::new("left", left_ms, Action::SetA("left"), recorder))
        .add_node("right", ProbeNode::new("right", right_ms, Action::SetB("right"), recorder))
        .add_node("join", ProbeNode::new("join", 0, Action::Log, recorder))
        .add_edge(START, "root")
        .add_edge("root", "left")
        .add_edge("root", "right")
        .add_edge("left", "join")
        .add_edge("right", "join")
        .add_edge("join", END);
    graph.compile().unwrap()
}

async fn collect(mut rx: mpsc::Receiver<RunEvent>) -> Vec<RunEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

/// **Scenario**: No node body starts before every predecessor body has ended.
#[tokio::test]
async fn run_respects_topological_order() {
    let recorder = Recorder::new();
    let graph = diamond(&recorder, 30, 5);
    let out = graph.invoke(Probe::default()).await.unwrap();

    for (from, to) in [("root", "left"), ("root", "right"), ("left", "join"), ("right", "join")] {
        let end = recorder.position(&format!("end:{}", from)).unwrap();
        let start = recorder.position(&format!("start:{}", to)).unwrap();
        assert!(end < start, "{} must end before {} starts: {:?}", from, to, recorder.trace());
    }
    assert_eq!(out.a.as_deref(), Some("left"));
    assert_eq!(out.b.as_deref(), Some("right"));
    assert_eq!(out.log, vec!["root", "join"]);
}

/// **Scenario**: The fan-in node starts exactly once, after all its predecessors completed.
#[tokio::test]
async fn fan_in_runs_once_after_all_predecessors() {
    let recorder = Recorder::new();
    let graph = diamond(&recorder, 40, 1);
    let (tx, rx) = mpsc::channel(64);
    Executor::new()
        .with_event_sender(tx)
        .run(&graph, Probe::default())
        .await
        .unwrap();
    let events = collect(rx).await;

    let join_starts: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e, RunEvent::NodeStart { node, .. } if node == "join"))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(join_starts.len(), 1);
    for pred in ["left", "right"] {
        let done = events
            .iter()
            .position(|e| matches!(e, RunEvent::NodeComplete { node, .. } if node == pred))
            .unwrap();
        assert!(done < join_starts[0]);
    }
    assert_eq!(recorder.count("start:join"), 1);
}

/// **Scenario**: Completing a fan-out node makes all its successors one wave.
#[tokio::test]
async fn fan_out_successors_share_a_wave() {
    let recorder = Recorder::new();
    let graph = diamond(&recorder, 1, 1);
    let (tx, rx) = mpsc::channel(64);
    Executor::new()
        .with_event_sender(tx)
        .run(&graph, Probe::default())
        .await
        .unwrap();

    let waves: Vec<Vec<String>> = collect(rx)
        .await
        .into_iter()
        .filter_map(|e| match e {
            RunEvent::WaveStart { nodes, .. } => Some(nodes),
            _ => None,
        })
        .collect();
    assert_eq!(
        waves,
        vec![
            vec!["root".to_string()],
            vec!["left".to_string(), "right".to_string()],
            vec!["join".to_string()],
        ]
    );
}

/// **Scenario**: Disjoint writers in one wave merge to the same state whatever finishes first.
#[tokio::test]
async fn merge_is_independent_of_completion_order() {
    let left_first = diamond(&Recorder::new(), 1, 40)
        .invoke(Probe::default())
        .await
        .unwrap();
    let right_first = diamond(&Recorder::new(), 40, 1)
        .invoke(Probe::default())
        .await
        .unwrap();
    assert_eq!(left_first, right_first);
}

/// **Scenario**: Nodes see previous waves fully merged and never a same-wave sibling's output.
#[tokio::test]
async fn snapshot_isolation_between_siblings() {
    let recorder = Recorder::new();
    let mut graph = StateGraph::<Probe>::new();
    graph
        .add_node("writer", ProbeNode::new("writer", 0, Action::SetA("written"), &recorder))
        .add_node("sibling", ProbeNode::new("sibling", 30, Action::ReadA, &recorder))
        .add_node("after", ProbeNode::new("after", 0, Action::ReadA, &recorder))
        .add_edge(START, "writer")
        .add_edge(START, "sibling")
        .add_edge("writer", "after")
        .add_edge("sibling", "after")
        .add_edge("after", END);
    let out = graph.compile().unwrap().invoke(Probe::default()).await.unwrap();
    assert_eq!(
        out.log,
        vec!["sibling:None".to_string(), "after:Some(\"written\")".to_string()]
    );
}

/// **Scenario**: With max_concurrency 1 the run completes and bodies never overlap.
#[tokio::test]
async fn max_concurrency_one_serializes_bodies() {
    let recorder = Recorder::new();
    let mut graph = StateGraph::<Probe>::new();
    graph
        .add_node("x", ProbeNode::new("x", 20, Action::SetA("x"), &recorder))
        .add_node("y", ProbeNode::new("y", 20, Action::SetB("y"), &recorder))
        .add_node("z", ProbeNode::new("z", 20, Action::SetC("z"), &recorder))
        .add_edge(START, "x")
        .add_edge(START, "y")
        .add_edge(START, "z")
        .add_edge("x", END)
        .add_edge("y", END)
        .add_edge("z", END);
    let graph = graph.compile().unwrap();

    let out = Executor::new()
        .with_max_concurrency(1)
        .run(&graph, Probe::default())
        .await
        .unwrap();
    assert_eq!(recorder.peak(), 1);
    assert_eq!(out.a.as_deref(), Some("x"));
    assert_eq!(out.b.as_deref(), Some("y"));
    assert_eq!(out.c.as_deref(), Some("z"));
}

/// **Scenario**: Without a bound, independent nodes of one wave overlap.
#[tokio::test]
async fn unbounded_wave_runs_concurrently() {
    let recorder = Recorder::new();
    let mut graph = StateGraph::<Probe>::new();
    graph
        .add_node("x", ProbeNode::new("x", 50, Action::SetA("x"), &recorder))
        .add_node("y", ProbeNode::new("y", 50, Action::SetB("y"), &recorder))
        .add_edge(START, "x")
        .add_edge(START, "y")
        .add_edge("x", END)
        .add_edge("y", END);
    graph.compile().unwrap().invoke(Probe::default()).await.unwrap();
    assert_eq!(recorder.peak(), 2);
}

/// **Scenario**: A failing node aborts the run; its successors never start and
/// nothing from the failing wave is returned.
#[tokio::test]
async fn failing_node_aborts_run() {
    let recorder = Recorder::new();
    let mut graph = StateGraph::<Probe>::new();
    graph
        .add_node("ok", ProbeNode::new("ok", 0, Action::SetA("ok"), &recorder))
        .add_node("bad", ProbeNode::new("bad", 10, Action::Fail, &recorder))
        .add_node("join", ProbeNode::new("join", 0, Action::Log, &recorder))
        .add_edge(START, "ok")
        .add_edge(START, "bad")
        .add_edge("ok", "join")
        .add_edge("bad", "join")
        .add_edge("join", END);
    let graph = graph.compile().unwrap();

    let (tx, rx) = mpsc::channel(64);
    let err = Executor::new()
        .with_event_sender(tx)
        .run(&graph, Probe::default())
        .await
        .unwrap_err();
    match &err {
        RunError::NodeExecution { node, source } => {
            assert_eq!(node, "bad");
            assert!(source.to_string().contains("bad failed"));
        }
        other => panic!("expected NodeExecution, got {:?}", other),
    }
    assert_eq!(recorder.count("start:join"), 0);

    let events = collect(rx).await;
    assert!(events
        .iter()
        .any(|e| matches!(e, RunEvent::NodeFailed { node, .. } if node == "bad")));
    assert!(!events.iter().any(|e| matches!(e, RunEvent::RunComplete { .. })));
}

/// **Scenario**: Two nodes overwriting the same field in one wave is an aggregation error.
#[tokio::test]
async fn same_wave_overwrite_conflict() {
    let recorder = Recorder::new();
    let mut graph = StateGraph::<Probe>::new();
    graph
        .add_node("first", ProbeNode::new("first", 0, Action::SetA("1"), &recorder))
        .add_node("second", ProbeNode::new("second", 20, Action::SetA("2"), &recorder))
        .add_edge(START, "first")
        .add_edge(START, "second")
        .add_edge("first", END)
        .add_edge("second", END);
    let err = graph
        .compile()
        .unwrap()
        .invoke(Probe::default())
        .await
        .unwrap_err();
    match err {
        RunError::Aggregation(AggregationError::ConflictingWrite { field, first, second }) => {
            assert_eq!(field, "a");
            assert_eq!(first, "first");
            assert_eq!(second, "second");
        }
        other => panic!("expected Aggregation, got {:?}", other),
    }
}

/// **Scenario**: Events open with the first wave and close with RunComplete.
#[tokio::test]
async fn events_bracket_the_run() {
    let recorder = Recorder::new();
    let graph = diamond(&recorder, 1, 1);
    let (tx, rx) = mpsc::channel(64);
    Executor::new()
        .with_event_sender(tx)
        .run(&graph, Probe::default())
        .await
        .unwrap();
    let events = collect(rx).await;

    assert!(matches!(events.first(), Some(RunEvent::WaveStart { wave: 0, .. })));
    assert_eq!(events.last(), Some(&RunEvent::RunComplete { waves: 3 }));
    let completes = events
        .iter()
        .filter(|e| matches!(e, RunEvent::NodeComplete { .. }))
        .count();
    assert_eq!(completes, 4);
}
