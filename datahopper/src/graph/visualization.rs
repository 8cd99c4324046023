//! Graph visualization utilities.
//!
//! Exports a compiled graph to Graphviz DOT or to a plain-text wave listing.

use std::fmt::Write;

use crate::channels::Reducible;

use super::CompiledStateGraph;
use super::{END, START};

/// Generate Graphviz DOT format representation of the graph.
///
/// Returns a string in DOT format that can be rendered using Graphviz tools.
pub fn generate_dot<S: Reducible>(graph: &CompiledStateGraph<S>) -> String {
    let mut dot = String::from("digraph {\n");
    dot.push_str("  rankdir=LR;\n");
    dot.push_str("  node [shape=box];\n\n");

    let _ = writeln!(
        dot,
        "  \"{}\" [label=\"START\", style=bold, fillcolor=lightgreen];",
        START
    );
    let _ = writeln!(
        dot,
        "  \"{}\" [label=\"END\", style=bold, fillcolor=lightcoral];",
        END
    );

    for node_id in graph.node_ids() {
        let _ = writeln!(dot, "  \"{}\";", node_id);
    }

    dot.push('\n');

    for (from, to) in graph.edges() {
        let _ = writeln!(dot, "  \"{}\" -> \"{}\";", from, to);
    }

    dot.push_str("}\n");
    dot
}

/// Generate a simple text representation of the graph structure: nodes grouped
/// by the wave they run in, with each node's dependencies.
pub fn generate_text<S: Reducible>(graph: &CompiledStateGraph<S>) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Graph Structure:");
    let _ = writeln!(text, "Nodes: {}", graph.node_count());
    let _ = writeln!(text, "Edges: {}", graph.edges().len());

    let _ = writeln!(text, "\nWaves:");
    let _ = writeln!(text, "  {}", START);
    for (i, wave) in graph.wave_plan().iter().enumerate() {
        let _ = writeln!(text, "  wave {}:", i);
        for node in wave {
            let preds = graph.predecessors(node);
            if preds.is_empty() {
                let _ = writeln!(text, "    {} <- {}", node, START);
            } else {
                let _ = writeln!(text, "    {} <- {}", node, preds.join(", "));
            }
        }
    }
    let _ = writeln!(
        text,
        "  {} <- {}",
        END,
        graph.terminal_predecessors().join(", ")
    );

    text
}
