//! Turn-level error taxonomy.
//!
//! Validation errors and retrieval failures are caller-visible; generation
//! failures are recovered inside the orchestrator with a fixed apology and
//! never appear here. That asymmetry is part of the service contract.

use thiserror::Error;

use crate::retrieval::RetrievalError;

/// Errors a conversational turn can surface to the caller.
#[derive(Debug, Error)]
pub enum TurnError {
    /// A required field was absent or empty. No session state was touched.
    #[error("{0}")]
    BadRequest(String),

    /// The retrieval collaborator failed; the turn is not answered.
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_display_is_bare_message() {
        let err = TurnError::BadRequest("Missing chat_id or msg".to_string());
        assert_eq!(err.to_string(), "Missing chat_id or msg");
    }

    #[test]
    fn test_retrieval_error_converts() {
        let err: TurnError = RetrievalError::Index("upstream 500".to_string()).into();
        assert!(err.to_string().contains("retrieval failed"));
        assert!(err.to_string().contains("upstream 500"));
    }
}
