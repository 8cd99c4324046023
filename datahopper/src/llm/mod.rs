//! LLM client abstraction for the research nodes.
//!
//! Every node that talks to a model (URL selection, per-source analysis,
//! synthesis) depends on [`LlmClient`] only; this module defines the trait, a
//! mock implementation and an OpenAI-compatible client.

mod mock;
mod openai;

pub use mock::MockLlm;
pub use openai::ChatOpenAI;

use async_trait::async_trait;

use crate::error::NodeError;
use crate::message::Message;

/// Token usage for one LLM call (prompt + completion).
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LlmUsage {
    /// Tokens in the prompt (input).
    pub prompt_tokens: u32,
    /// Tokens in the completion (output).
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
}

/// Response from an LLM completion.
#[derive(Clone, Debug, Default)]
pub struct LlmResponse {
    /// Assistant message content (plain text).
    pub content: String,
    /// Token usage for this call, when the provider reports it.
    pub usage: Option<LlmUsage>,
}

/// LLM client: given messages, returns the assistant text.
///
/// Implementations: `MockLlm` (scripted responses), `ChatOpenAI` (real API).
///
/// **Interaction**: Used by the research nodes through `complete`.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Invoke one turn: read messages, return assistant content.
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, NodeError>;

    /// Convenience for a single system + user exchange; returns the content only.
    async fn complete(&self, system: &str, user: &str) -> Result<String, NodeError> {
        let messages = [Message::system(system), Message::user(user)];
        Ok(self.invoke(&messages).await?.content)
    }
}
