//! Retrieved-passage types for Symptomix.
//!
//! A passage is a read-only unit of reference text returned by the
//! similarity index, consumed once per turn to ground generation. Passages
//! are never persisted.

use serde::{Deserialize, Serialize};

/// A retrieved reference passage, ranked by semantic similarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    /// The reference text used to ground generation.
    pub text: String,
    /// Opaque provenance (e.g., the source document), when the index has it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Similarity score reported by the index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl Passage {
    /// Build a passage carrying only text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: None,
            score: None,
        }
    }
}

/// Errors from retrieval operations.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("index error: {0}")]
    Index(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("index '{0}' is not ready")]
    NotReady(String),

    #[error("malformed index response: {0}")]
    Deserialization(String),
}
