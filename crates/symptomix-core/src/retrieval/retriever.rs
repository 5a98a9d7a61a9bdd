//! Retriever trait definition.
//!
//! The retrieval gateway: given a composed query string, return reference
//! passages ranked by descending semantic similarity. Implementations live
//! in symptomix-infra. Uses RPITIT (native async fn in traits).

use symptomix_types::retrieval::{Passage, RetrievalError};

/// Trait for similarity-search backends.
///
/// Retrieval must not mutate session state. Failures propagate to the turn
/// orchestrator; no local retry is attempted.
pub trait Retriever: Send + Sync {
    /// Fetch up to `top_k` passages ranked by similarity to `query`.
    fn retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Passage>, RetrievalError>> + Send;
}
