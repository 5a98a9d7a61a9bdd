//! Pinecone-backed retriever.
//!
//! Composes an [`Embedder`] with a [`PineconeIndex`] into the `Retriever`
//! capability: embed the composed query locally, then run a similarity
//! query against the index's data plane.

use symptomix_core::retrieval::embedder::Embedder;
use symptomix_core::retrieval::retriever::Retriever;
use symptomix_types::retrieval::{Passage, RetrievalError};

use super::pinecone::PineconeIndex;

/// Production retrieval gateway: local embedding + Pinecone query.
pub struct PineconeRetriever<E: Embedder> {
    embedder: E,
    index: PineconeIndex,
}

impl<E: Embedder> PineconeRetriever<E> {
    pub fn new(embedder: E, index: PineconeIndex) -> Self {
        Self { embedder, index }
    }

    /// The embedding model backing this retriever.
    pub fn embedder(&self) -> &E {
        &self.embedder
    }
}

impl<E: Embedder> Retriever for PineconeRetriever<E> {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<Passage>, RetrievalError> {
        let texts = [query.to_string()];
        let mut embeddings = self.embedder.embed(&texts).await?;

        let embedding = if embeddings.is_empty() {
            return Err(RetrievalError::Embedding(
                "embedder returned no vector for query".to_string(),
            ));
        } else {
            embeddings.swap_remove(0)
        };

        let passages = self.index.query(&embedding, top_k).await?;
        tracing::debug!(
            index = %self.index.index_name(),
            passages = passages.len(),
            "similarity query completed"
        );
        Ok(passages)
    }
}
