//! State graph: nodes + dependency edges, compile, then run wave by wave.
//!
//! `StateGraph`: add nodes and edges, compile into a validated DAG, then run it
//! with an [`Executor`] (or `CompiledStateGraph::invoke`).

mod compile_error;
mod compiled;
mod execution_state;
mod executor;
mod fn_node;
mod logging;
mod name_node;
mod node;
mod run_error;
mod state_graph;
mod topology;
mod visualization;

pub use compile_error::ValidationError;
pub use compiled::CompiledStateGraph;
pub use execution_state::NodeStatus;
pub use executor::Executor;
pub use fn_node::FnNode;
pub use logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_failed,
    log_node_start, log_wave_start,
};
pub use name_node::NameNode;
pub use node::Node;
pub use run_error::RunError;
pub use state_graph::{StateGraph, END, START};
pub use visualization::{generate_dot, generate_text};
