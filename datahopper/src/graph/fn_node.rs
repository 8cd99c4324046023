//! Closure-backed node.
//!
//! Wraps an async closure `Fn(Arc<S>) -> Future<Output = Result<S::Update, NodeError>>`
//! so small nodes (and test doubles) do not need their own struct.

use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::channels::Reducible;
use crate::error::NodeError;

use super::Node;

/// A node whose body is a closure.
///
/// ```rust,ignore
/// let node = FnNode::new("count", |state: Arc<MyState>| async move {
///     Ok(MyUpdate { total: Some(state.items.len()), ..Default::default() })
/// });
/// graph.add_node("count", Arc::new(node));
/// ```
pub struct FnNode<S, F> {
    name: String,
    f: F,
    _marker: PhantomData<fn() -> S>,
}

impl<S, F> FnNode<S, F> {
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<S, F, Fut> Node<S> for FnNode<S, F>
where
    S: Reducible,
    F: Fn(Arc<S>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<S::Update, NodeError>> + Send,
{
    fn id(&self) -> &str {
        &self.name
    }

    async fn run(&self, state: Arc<S>) -> Result<S::Update, NodeError> {
        (self.f)(state).await
    }
}
