//! Name node: a no-op node that only has a name.
//!
//! Implements `Node<S>` for any reducible state. Useful as a join point or a
//! placeholder while wiring a graph; it writes nothing.

use async_trait::async_trait;
use std::sync::Arc;

use crate::channels::Reducible;
use crate::error::NodeError;

use super::Node;

/// A node that does nothing except expose a name; returns an empty update.
pub struct NameNode {
    name: String,
}

impl NameNode {
    /// Creates a name node with the given id (returned by `Node::id`).
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl<S> Node<S> for NameNode
where
    S: Reducible,
{
    fn id(&self) -> &str {
        &self.name
    }

    async fn run(&self, _state: Arc<S>) -> Result<S::Update, NodeError> {
        Ok(S::Update::default())
    }
}
