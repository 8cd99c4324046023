//! DataHopper CLI library: runner wiring, progress rendering and output formatting.
//!
//! The binary (`src/main.rs`) only parses arguments and calls into this crate, so
//! everything here can be tested without spawning a process.

pub mod repl;

use std::io::Write;

use datahopper::{
    BuildError, ResearchDeps, ResearchError, ResearchOutcome, ResearchRunner, ResearchSettings,
    RunEvent,
};
use tokio::sync::mpsc;

/// Capacity of the progress event channel for one research run.
const EVENT_BUFFER: usize = 64;

/// Wires the runner: canned mock collaborators when `offline`, real clients from
/// `settings` otherwise.
pub fn build_runner(
    offline: bool,
    settings: &ResearchSettings,
) -> Result<ResearchRunner, BuildError> {
    if offline {
        let mut runner = ResearchRunner::new(ResearchDeps::offline())?;
        if let Some(limit) = settings.max_concurrency {
            runner = runner.with_executor(datahopper::Executor::new().with_max_concurrency(limit));
        }
        Ok(runner)
    } else {
        ResearchRunner::from_settings(settings)
    }
}

/// One progress line for `event`, or `None` for events not shown.
pub fn format_event(event: &RunEvent) -> Option<String> {
    match event {
        RunEvent::WaveStart { wave, nodes } => {
            Some(format!("[wave {}] {}", wave + 1, nodes.join(", ")))
        }
        RunEvent::NodeStart { .. } => None,
        RunEvent::NodeComplete {
            node, elapsed_ms, ..
        } => Some(format!("  done {} ({} ms)", node, elapsed_ms)),
        RunEvent::NodeFailed { node, error, .. } => {
            Some(format!("  FAILED {}: {}", node, error))
        }
        RunEvent::RunComplete { waves } => Some(format!("completed in {} waves", waves)),
    }
}

/// Runs one question. With `progress`, lifecycle lines are written to stderr as
/// they happen; the answer itself is left to the caller.
pub async fn ask(
    runner: &ResearchRunner,
    question: &str,
    progress: bool,
) -> Result<ResearchOutcome, ResearchError> {
    if !progress {
        return runner.research(question).await;
    }
    let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
    let printer = tokio::spawn(async move {
        let mut stderr = std::io::stderr();
        while let Some(event) = rx.recv().await {
            if let Some(line) = format_event(&event) {
                let _ = writeln!(stderr, "{}", line);
            }
        }
    });
    let result = runner.research_with_events(question, tx).await;
    let _ = printer.await;
    result
}

/// JSON printed by `ask --json`.
pub fn outcome_json(outcome: &ResearchOutcome) -> serde_json::Value {
    serde_json::json!({
        "final_answer": outcome.final_answer,
        "google_results": outcome.google_results,
        "bing_results": outcome.bing_results,
        "reddit_results": outcome.reddit_results,
        "status": "completed",
    })
}

/// `exit`, `quit` and `/quit` (any case) end the chat loop.
pub fn is_quit_command(s: &str) -> bool {
    let lower = s.trim().to_lowercase();
    matches!(lower.as_str(), "quit" | "exit" | "/quit")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_quit_command_matches_expected_tokens() {
        assert!(is_quit_command("quit"));
        assert!(is_quit_command(" EXIT "));
        assert!(is_quit_command("/quit"));
        assert!(!is_quit_command("exit strategy for index funds"));
    }

    #[test]
    fn node_start_is_not_printed() {
        let event = RunEvent::NodeStart {
            wave: 0,
            node: "search-google".into(),
        };
        assert_eq!(format_event(&event), None);
    }
}
