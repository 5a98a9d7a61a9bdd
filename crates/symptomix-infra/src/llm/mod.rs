//! Generation provider implementations.
//!
//! Contains the concrete [`LlmProvider`] implementation for any
//! OpenAI-compatible chat-completions API, used in production against Groq,
//! plus a connection probe for the `check` command.

pub mod openai_compat;

use symptomix_core::llm::provider::LlmProvider;
use symptomix_types::llm::{CompletionRequest, LlmError, Message};

/// Test provider connectivity by sending a minimal completion request.
///
/// Sends a tiny "Hello" message with minimal token budget to verify the API
/// key and endpoint are working.
pub async fn test_provider_connection<P: LlmProvider>(provider: &P) -> Result<(), LlmError> {
    let request = CompletionRequest {
        model: String::new(), // Provider uses its configured default
        messages: vec![Message::user("Hello")],
        max_tokens: 10,
        temperature: Some(0.0),
        top_p: None,
    };
    provider.complete(&request).await?;
    Ok(())
}
