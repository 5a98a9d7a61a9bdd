//! Business logic and capability trait definitions for Symptomix.
//!
//! This crate defines the "ports" (retrieval and generation traits) that the
//! infrastructure layer implements, the process-wide session store, and the
//! turn orchestrator that composes them into one conversational turn. It
//! depends only on `symptomix-types` -- never on `symptomix-infra` or any
//! HTTP/IO crate.

pub mod chat;
pub mod llm;
pub mod retrieval;
pub mod session;
