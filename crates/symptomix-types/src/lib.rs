//! Shared domain types for Symptomix.
//!
//! This crate contains the core domain types used across the Symptomix
//! service: conversation messages, completion request/response shapes,
//! retrieved passages, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod retrieval;
