//! Mock LLM for tests and offline runs.
//!
//! Returns a fixed reply, a reply computed from the request, or a fixed error.
//! Counts calls so tests can assert a node did (or did not) reach the model.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::NodeError;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::Message;

type Responder = dyn Fn(&[Message]) -> Result<String, NodeError> + Send + Sync;

/// Mock LLM: scripted assistant text.
///
/// **Interaction**: Implements `LlmClient`; plugged into `ResearchDeps` in tests
/// and by `datahopper ask --offline`.
pub struct MockLlm {
    responder: Arc<Responder>,
    calls: AtomicUsize,
}

impl MockLlm {
    /// Always answers `content`.
    pub fn with_reply(content: impl Into<String>) -> Self {
        let content = content.into();
        Self::with_responder(move |_| Ok(content.clone()))
    }

    /// Always fails with `NodeError::ExecutionFailed(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::with_responder(move |_| Err(NodeError::ExecutionFailed(message.clone())))
    }

    /// Computes each reply from the request messages.
    pub fn with_responder<F>(f: F) -> Self
    where
        F: Fn(&[Message]) -> Result<String, NodeError> + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(f),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `invoke` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, NodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let content = (self.responder)(messages)?;
        Ok(LlmResponse {
            content,
            usage: None,
        })
    }
}
