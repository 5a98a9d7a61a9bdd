//! FastEmbed-based local embedding generator.
//!
//! Implements the `Embedder` trait from `symptomix-core` using fastembed's
//! AllMiniLML6V2 model (384 dimensions, matching the index) with ONNX
//! runtime inference. Inference is CPU-bound, so it runs on the blocking
//! thread pool.

use std::sync::{Arc, Mutex};

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use symptomix_core::retrieval::embedder::Embedder;
use symptomix_types::retrieval::RetrievalError;

/// Canonical name of the sentence-transformer behind AllMiniLML6V2.
const MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// Output dimensionality of the model; the index is created to match.
const DIMENSION: usize = 384;

/// Local embedding generator over fastembed.
pub struct FastEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
}

impl FastEmbedder {
    /// Load the embedding model, downloading it on first use.
    pub fn new() -> Result<Self, RetrievalError> {
        let model = TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false),
        )
        .map_err(|e| RetrievalError::Embedding(e.to_string()))?;

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }
}

impl Embedder for FastEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        let model = Arc::clone(&self.model);
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|_| RetrievalError::Embedding("embedding model lock poisoned".to_string()))?;
            model
                .embed(texts, None)
                .map_err(|e| RetrievalError::Embedding(e.to_string()))
        })
        .await
        .map_err(|e| RetrievalError::Embedding(format!("embedding task failed: {e}")))?
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }
}
