//! Wire types for the Pinecone control and data planes.
//!
//! Request shapes use Pinecone's camelCase field names via serde renames.
//! Query matches carry passage text under the `text` metadata key (the key
//! the ingestion pipeline writes page content to) and optional provenance
//! under `source`.

use serde::{Deserialize, Serialize};

use symptomix_types::retrieval::Passage;

/// Control-plane request to create a serverless index.
#[derive(Debug, Serialize)]
pub struct CreateIndexRequest {
    pub name: String,
    pub dimension: usize,
    pub metric: String,
    pub spec: IndexSpec,
}

#[derive(Debug, Serialize)]
pub struct IndexSpec {
    pub serverless: ServerlessSpec,
}

#[derive(Debug, Serialize)]
pub struct ServerlessSpec {
    pub cloud: String,
    pub region: String,
}

/// Control-plane description of an index.
#[derive(Debug, Deserialize)]
pub struct IndexDescription {
    pub name: String,
    /// Data-plane host for queries, without a scheme.
    pub host: String,
    pub status: IndexStatus,
}

#[derive(Debug, Deserialize)]
pub struct IndexStatus {
    pub ready: bool,
}

/// Data-plane similarity query.
#[derive(Debug, Serialize)]
pub struct QueryRequest {
    pub vector: Vec<f32>,
    #[serde(rename = "topK")]
    pub top_k: usize,
    #[serde(rename = "includeMetadata")]
    pub include_metadata: bool,
}

/// Data-plane query response.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub metadata: Option<PassageMetadata>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PassageMetadata {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl QueryMatch {
    /// Convert a match into a passage; matches without text metadata carry
    /// nothing to ground on and are dropped.
    pub fn into_passage(self) -> Option<Passage> {
        let metadata = self.metadata.unwrap_or_default();
        let text = metadata.text?;
        Some(Passage {
            text,
            source: metadata.source,
            score: self.score,
        })
    }
}
