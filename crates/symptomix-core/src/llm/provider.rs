//! LlmProvider trait definition.
//!
//! The generation gateway: given a structured conversation, produce one
//! assistant utterance. Implementations live in symptomix-infra (e.g., the
//! Groq-backed OpenAI-compatible provider). Uses native async fn in traits
//! (RPITIT, Rust 2024 edition).

use symptomix_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for generation provider backends.
///
/// Providers must not mutate session state; the turn orchestrator alone
/// appends the generated answer to the transcript.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "groq").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
