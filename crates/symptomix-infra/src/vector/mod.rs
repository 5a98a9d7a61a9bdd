//! Similarity-search infrastructure.
//!
//! Provides the Pinecone serverless index client, fastembed-based local
//! embedding generation, and the retriever that composes the two into the
//! `Retriever` capability consumed by the orchestrator.

pub mod embedder;
pub mod pinecone;
pub mod retriever;
pub mod types;
