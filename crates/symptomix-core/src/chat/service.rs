//! Chat service orchestrating one conversational turn.
//!
//! ChatService owns the session store and coordinates the query composer,
//! the retrieval gateway, and the generation gateway into the per-turn
//! algorithm: validate, compose, retrieve, seed persona, append the
//! grounded user prompt, generate, append the answer.
//!
//! Failure policy: validation and retrieval errors are caller-visible
//! ([`TurnError`]); generation failures are recovered here with a fixed
//! fallback reply, leaving the transcript without its assistant turn.

use tracing::{debug, info, warn};

use symptomix_types::config::AppConfig;
use symptomix_types::error::TurnError;
use symptomix_types::llm::CompletionRequest;

use crate::chat::compose;
use crate::llm::provider::LlmProvider;
use crate::retrieval::retriever::Retriever;
use crate::session::store::SessionStore;

/// Persona and grounding policy seeded as the single system message.
pub const SYSTEM_PROMPT: &str = "You are a helpful, knowledgeable, and professional medical assistant. \
    Your task is to provide accurate and concise answers to medical questions based on the provided context. \
    Your name is Symptomix. \
    Use the context below to accurately answer the user's medical question. \
    If the user greets you, respond with a polite greeting first. \
    If the answer is not available in the context, say that you don't know instead of making something up. \
    Keep your response clear, concise, and medically sound.";

/// Fixed user-facing reply when no usable answer could be generated.
pub const FALLBACK_REPLY: &str = "I apologize, but I couldn't generate a response at this time.";

/// Per-turn constants resolved from configuration once at startup.
#[derive(Debug, Clone)]
pub struct TurnOptions {
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
    /// Retrieval fan-out: passages fetched per turn.
    pub top_k: usize,
}

impl From<&AppConfig> for TurnOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            model: config.generation.model.clone(),
            temperature: config.generation.temperature,
            top_p: config.generation.top_p,
            max_tokens: config.generation.max_tokens,
            top_k: config.retrieval.top_k,
        }
    }
}

/// Orchestrates conversational turns over injected gateways.
///
/// Generic over [`Retriever`] and [`LlmProvider`] so tests can substitute
/// deterministic doubles for the external services.
pub struct ChatService<R: Retriever, P: LlmProvider> {
    store: SessionStore,
    retriever: R,
    provider: P,
    options: TurnOptions,
}

impl<R: Retriever, P: LlmProvider> ChatService<R, P> {
    /// Create a chat service with an empty session store.
    pub fn new(retriever: R, provider: P, options: TurnOptions) -> Self {
        Self {
            store: SessionStore::new(),
            retriever,
            provider,
            options,
        }
    }

    /// Access the session store.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Handle one conversational turn for `(chat_id, user_text)`.
    ///
    /// Returns the generated answer, or the fixed fallback reply when the
    /// provider produced no usable output. Validation and retrieval
    /// failures surface as [`TurnError`] without an answer.
    pub async fn turn(&self, chat_id: &str, user_text: &str) -> Result<String, TurnError> {
        if chat_id.trim().is_empty() || user_text.trim().is_empty() {
            return Err(TurnError::BadRequest("Missing chat_id or msg".to_string()));
        }

        self.store.get_or_create(chat_id);

        let prior_inputs = self.store.user_inputs(chat_id);
        let query = compose::retrieval_query(&prior_inputs, user_text);
        debug!(chat_id = %chat_id, prior_turns = prior_inputs.len(), "composed retrieval query");

        let passages = self.retriever.retrieve(&query, self.options.top_k).await?;
        debug!(chat_id = %chat_id, passages = passages.len(), "retrieved context passages");

        if self.store.is_empty_session(chat_id) {
            self.store.seed_system(chat_id, SYSTEM_PROMPT);
        }

        let prompt = compose::grounded_prompt(&passages, user_text);
        let messages = self.store.append_user(chat_id, prompt, user_text.to_string());

        let request = CompletionRequest {
            model: self.options.model.clone(),
            messages,
            max_tokens: self.options.max_tokens,
            temperature: Some(self.options.temperature),
            top_p: Some(self.options.top_p),
        };

        match self.provider.complete(&request).await {
            Ok(response) => {
                let answer = response.content.trim();
                if answer.is_empty() {
                    warn!(chat_id = %chat_id, provider = self.provider.name(), "empty answer from provider");
                    return Ok(FALLBACK_REPLY.to_string());
                }
                self.store.append_assistant(chat_id, answer.to_string());
                info!(
                    chat_id = %chat_id,
                    output_tokens = response.usage.output_tokens,
                    "turn completed"
                );
                Ok(answer.to_string())
            }
            Err(err) => {
                // The just-appended user turn stays; the transcript is left
                // awaiting its assistant message.
                warn!(chat_id = %chat_id, error = %err, "generation failed, replying with fallback");
                Ok(FALLBACK_REPLY.to_string())
            }
        }
    }

    /// Destroy the session for `chat_id`. Idempotent; unknown ids are a no-op.
    pub fn reset(&self, chat_id: &str) {
        self.store.reset(chat_id);
        info!(chat_id = %chat_id, "session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use symptomix_types::chat::MessageRole;
    use symptomix_types::llm::{CompletionResponse, LlmError, StopReason, Usage};
    use symptomix_types::retrieval::{Passage, RetrievalError};

    #[derive(Clone)]
    struct MockRetriever {
        queries: Arc<Mutex<Vec<String>>>,
        passages: Vec<Passage>,
        fail: bool,
    }

    impl MockRetriever {
        fn returning(passages: Vec<Passage>) -> Self {
            Self {
                queries: Arc::new(Mutex::new(Vec::new())),
                passages,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                queries: Arc::new(Mutex::new(Vec::new())),
                passages: Vec::new(),
                fail: true,
            }
        }

        fn recorded_queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    impl Retriever for MockRetriever {
        async fn retrieve(
            &self,
            query: &str,
            _top_k: usize,
        ) -> Result<Vec<Passage>, RetrievalError> {
            self.queries.lock().unwrap().push(query.to_string());
            if self.fail {
                return Err(RetrievalError::Index("index offline".to_string()));
            }
            Ok(self.passages.clone())
        }
    }

    #[derive(Clone)]
    enum Reply {
        Text(&'static str),
        Blank,
        Error,
    }

    #[derive(Clone)]
    struct MockProvider {
        reply: Reply,
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl MockProvider {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn recorded_requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(request.clone());
            match self.reply {
                Reply::Text(text) => Ok(CompletionResponse {
                    id: "cmpl-1".to_string(),
                    content: text.to_string(),
                    model: request.model.clone(),
                    stop_reason: StopReason::EndTurn,
                    usage: Usage {
                        input_tokens: 10,
                        output_tokens: 5,
                    },
                }),
                Reply::Blank => Ok(CompletionResponse {
                    id: "cmpl-1".to_string(),
                    content: "   ".to_string(),
                    model: request.model.clone(),
                    stop_reason: StopReason::EndTurn,
                    usage: Usage::default(),
                }),
                Reply::Error => Err(LlmError::Provider {
                    message: "boom".to_string(),
                }),
            }
        }
    }

    fn service(
        retriever: MockRetriever,
        provider: MockProvider,
    ) -> ChatService<MockRetriever, MockProvider> {
        ChatService::new(retriever, provider, TurnOptions::from(&AppConfig::default()))
    }

    fn passages() -> Vec<Passage> {
        vec![
            Passage::new("Metformin is a first-line oral antihyperglycemic."),
            Passage::new("Common starting dose is 500mg twice daily."),
        ]
    }

    #[tokio::test]
    async fn first_turn_seeds_system_and_appends_exchange() {
        let retriever = MockRetriever::returning(passages());
        let provider = MockProvider::new(Reply::Text("Metformin is a diabetes medication."));
        let svc = service(retriever.clone(), provider);

        let answer = svc.turn("s1", "What is metformin?").await.unwrap();
        assert_eq!(answer, "Metformin is a diabetes medication.");

        assert_eq!(retriever.recorded_queries(), ["What is metformin?"]);

        let transcript = svc.store().transcript("s1");
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[0].role, MessageRole::System);
        assert_eq!(transcript[0].content, SYSTEM_PROMPT);
        assert_eq!(transcript[1].role, MessageRole::User);
        assert!(transcript[1].content.starts_with("Context:\n"));
        assert!(transcript[1].content.ends_with("Question: What is metformin?"));
        assert_eq!(transcript[2].role, MessageRole::Assistant);
    }

    #[tokio::test]
    async fn follow_up_query_is_history_augmented() {
        let retriever = MockRetriever::returning(passages());
        let provider = MockProvider::new(Reply::Text("500mg twice daily."));
        let svc = service(retriever.clone(), provider);

        svc.turn("s1", "What is metformin?").await.unwrap();
        svc.turn("s1", "What is its common dosage?").await.unwrap();

        let queries = retriever.recorded_queries();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[1], "What is metformin? What is its common dosage?");

        // The generation prompt carries the original question, not the
        // composed retrieval query.
        let transcript = svc.store().transcript("s1");
        let last_user = &transcript[transcript.len() - 2];
        assert_eq!(last_user.role, MessageRole::User);
        assert!(last_user.content.ends_with("Question: What is its common dosage?"));
    }

    #[tokio::test]
    async fn bad_request_leaves_store_untouched() {
        let retriever = MockRetriever::returning(passages());
        let provider = MockProvider::new(Reply::Text("unused"));
        let svc = service(retriever.clone(), provider);

        for (chat_id, msg) in [("", "What is metformin?"), ("s1", ""), ("", ""), ("s1", "   ")] {
            let err = svc.turn(chat_id, msg).await.unwrap_err();
            assert!(matches!(err, TurnError::BadRequest(_)));
        }

        assert_eq!(svc.store().session_count(), 0);
        assert!(retriever.recorded_queries().is_empty());
    }

    #[tokio::test]
    async fn generation_failure_leaves_user_turn() {
        let retriever = MockRetriever::returning(passages());
        let provider = MockProvider::new(Reply::Error);
        let svc = service(retriever, provider);

        let answer = svc.turn("s1", "What is metformin?").await.unwrap();
        assert_eq!(answer, FALLBACK_REPLY);

        let transcript = svc.store().transcript("s1");
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role, MessageRole::System);
        assert_eq!(transcript[1].role, MessageRole::User);
    }

    #[tokio::test]
    async fn blank_generation_is_treated_as_failure() {
        let retriever = MockRetriever::returning(passages());
        let provider = MockProvider::new(Reply::Blank);
        let svc = service(retriever, provider);

        let answer = svc.turn("s1", "What is metformin?").await.unwrap();
        assert_eq!(answer, FALLBACK_REPLY);
        assert_eq!(svc.store().transcript("s1").last().unwrap().role, MessageRole::User);
    }

    #[tokio::test]
    async fn retrieval_failure_propagates() {
        let retriever = MockRetriever::failing();
        let provider = MockProvider::new(Reply::Text("unused"));
        let svc = service(retriever, provider.clone());

        let err = svc.turn("s1", "What is metformin?").await.unwrap_err();
        assert!(matches!(err, TurnError::Retrieval(_)));

        // The lazily created session holds no messages, which is equivalent
        // to the session not existing.
        assert!(svc.store().is_empty_session("s1"));
        assert!(provider.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn reset_then_fresh_turn_starts_clean() {
        let retriever = MockRetriever::returning(passages());
        let provider = MockProvider::new(Reply::Text("answer"));
        let svc = service(retriever, provider);

        svc.turn("s1", "What is metformin?").await.unwrap();
        svc.turn("s1", "What is its common dosage?").await.unwrap();
        svc.reset("s1");
        assert!(!svc.store().contains("s1"));

        svc.turn("s1", "What is aspirin?").await.unwrap();
        let transcript = svc.store().transcript("s1");
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[0].role, MessageRole::System);
        assert_eq!(svc.store().user_inputs("s1"), ["What is aspirin?"]);
    }

    #[tokio::test]
    async fn reset_is_idempotent_for_unknown_sessions() {
        let retriever = MockRetriever::returning(Vec::new());
        let provider = MockProvider::new(Reply::Text("unused"));
        let svc = service(retriever, provider);

        svc.reset("never-seen");
        svc.reset("never-seen");
        assert_eq!(svc.store().session_count(), 0);
    }

    #[tokio::test]
    async fn assistant_reply_is_trimmed() {
        let retriever = MockRetriever::returning(passages());
        let provider = MockProvider::new(Reply::Text("  answer with padding \n"));
        let svc = service(retriever, provider);

        let answer = svc.turn("s1", "What is metformin?").await.unwrap();
        assert_eq!(answer, "answer with padding");
        assert_eq!(svc.store().transcript("s1")[2].content, "answer with padding");
    }

    #[tokio::test]
    async fn system_message_is_seeded_once() {
        let retriever = MockRetriever::returning(passages());
        let provider = MockProvider::new(Reply::Text("answer"));
        let svc = service(retriever, provider);

        svc.turn("s1", "first").await.unwrap();
        svc.turn("s1", "second").await.unwrap();
        svc.turn("s1", "third").await.unwrap();

        let transcript = svc.store().transcript("s1");
        let system_count = transcript
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .count();
        assert_eq!(system_count, 1);
        assert_eq!(transcript[0].role, MessageRole::System);
    }

    #[tokio::test]
    async fn generation_request_carries_transcript_and_sampling_constants() {
        let retriever = MockRetriever::returning(passages());
        let provider = MockProvider::new(Reply::Text("answer"));
        let svc = service(retriever, provider.clone());

        svc.turn("s1", "What is metformin?").await.unwrap();

        let requests = provider.recorded_requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.model, "meta-llama/llama-4-maverick-17b-128e-instruct");
        assert_eq!(request.max_tokens, 512);
        assert_eq!(request.temperature, Some(0.4));
        assert_eq!(request.top_p, Some(1.0));
        // system + grounded user prompt, assistant not yet appended
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert_eq!(request.messages[1].role, MessageRole::User);
    }
}
