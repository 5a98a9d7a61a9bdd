//! Application state wiring the services together.
//!
//! AppState pins the generic `ChatService` to the concrete infra
//! implementations: local fastembed embeddings feeding a Pinecone index for
//! retrieval, and the Groq OpenAI-compatible provider for generation.

use std::sync::Arc;

use secrecy::ExposeSecret;

use symptomix_core::chat::service::{ChatService, TurnOptions};
use symptomix_core::retrieval::embedder::Embedder;
use symptomix_infra::config::Secrets;
use symptomix_infra::llm::openai_compat::OpenAiCompatProvider;
use symptomix_infra::vector::embedder::FastEmbedder;
use symptomix_infra::vector::pinecone::PineconeIndex;
use symptomix_infra::vector::retriever::PineconeRetriever;
use symptomix_types::config::AppConfig;

/// Concrete type alias for the service generics pinned to infra implementations.
pub type ConcreteChatService = ChatService<PineconeRetriever<FastEmbedder>, OpenAiCompatProvider>;

/// Shared application state used by the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
}

impl AppState {
    /// Initialize the application state: resolve secrets, load the
    /// embedding model, connect (or create) the index, wire the service.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let secrets = Secrets::from_env()?;

        let provider = OpenAiCompatProvider::groq(
            secrets.groq_api_key.expose_secret(),
            &config.generation.model,
        );

        // Loading the model may download it on first run; this is startup,
        // not the request path.
        let embedder = FastEmbedder::new()?;
        let index = PineconeIndex::connect(
            secrets.pinecone_api_key,
            embedder.dimension(),
            &config.retrieval,
        )
        .await?;
        let retriever = PineconeRetriever::new(embedder, index);

        let chat_service = ChatService::new(retriever, provider, TurnOptions::from(config));

        Ok(Self {
            chat_service: Arc::new(chat_service),
        })
    }
}
