//! HTTP layer for Symptomix.
//!
//! Axum-based binding of the two turn operations (`POST /get`,
//! `POST /reset`) plus a health endpoint, with CORS and request tracing.

pub mod error;
pub mod handlers;
pub mod router;
