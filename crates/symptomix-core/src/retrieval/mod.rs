//! Retrieval abstractions for Symptomix.
//!
//! Defines the interfaces the infrastructure layer implements for semantic
//! search: [`retriever::Retriever`] for query-to-passages lookup and
//! [`embedder::Embedder`] for text-to-vector conversion.

pub mod embedder;
pub mod retriever;
