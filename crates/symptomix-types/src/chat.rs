//! Chat session transcript for Symptomix.
//!
//! A [`Session`] is the ordered conversational transcript associated with
//! one caller-supplied `chat_id`. It enforces the structural invariants of
//! a transcript (single leading system message, append-only messages) and
//! keeps a parallel log of each turn's raw user input: transcript user
//! entries carry the context-augmented prompt sent to generation, while the
//! retrieval query is composed from the raw inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export MessageRole from the llm module (used in both chat and llm contexts).
pub use crate::llm::MessageRole;

use crate::llm::Message;

/// One session's conversational state.
///
/// A session with zero messages is equivalent to a non-existent session;
/// the store may create entries eagerly without observable effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    started_at: DateTime<Utc>,
    messages: Vec<Message>,
    user_inputs: Vec<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            started_at: Utc::now(),
            messages: Vec::new(),
            user_inputs: Vec::new(),
        }
    }
}

impl Session {
    /// When the session entry was created.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Whether the transcript holds no messages yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of messages in the transcript.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// The ordered transcript.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Raw user inputs in arrival order, one per user turn.
    pub fn user_inputs(&self) -> &[String] {
        &self.user_inputs
    }

    /// Seed the single system message.
    ///
    /// Appends only when the transcript is empty, which keeps the invariant
    /// that at most one system message exists and it occupies index 0.
    /// Returns whether the message was appended.
    pub fn seed_system(&mut self, content: impl Into<String>) -> bool {
        if !self.messages.is_empty() {
            return false;
        }
        self.messages.push(Message::system(content));
        true
    }

    /// Append a user turn.
    ///
    /// `prompt` is the context-augmented content that goes on the transcript
    /// (and to generation); `raw_input` is the user's original text, logged
    /// for retrieval-query composition.
    pub fn push_user(&mut self, prompt: impl Into<String>, raw_input: impl Into<String>) {
        self.messages.push(Message::user(prompt));
        self.user_inputs.push(raw_input.into());
    }

    /// Append an assistant turn.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::default();
        assert!(session.is_empty());
        assert_eq!(session.len(), 0);
        assert!(session.user_inputs().is_empty());
    }

    #[test]
    fn test_seed_system_only_once() {
        let mut session = Session::default();
        assert!(session.seed_system("persona"));
        assert!(!session.seed_system("other persona"));
        assert_eq!(session.len(), 1);
        assert_eq!(session.messages()[0].role, MessageRole::System);
        assert_eq!(session.messages()[0].content, "persona");
    }

    #[test]
    fn test_seed_system_skipped_after_first_turn() {
        let mut session = Session::default();
        session.seed_system("persona");
        session.push_user("Context:\n\nQuestion: hi", "hi");
        session.push_assistant("hello");
        assert!(!session.seed_system("persona"));

        let system_count = session
            .messages()
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .count();
        assert_eq!(system_count, 1);
        assert_eq!(session.messages()[0].role, MessageRole::System);
    }

    #[test]
    fn test_push_user_records_raw_input() {
        let mut session = Session::default();
        session.push_user("Context:\n...\n\nQuestion: What is metformin?", "What is metformin?");
        assert_eq!(session.user_inputs(), ["What is metformin?"]);
        assert!(session.messages()[0].content.starts_with("Context:"));
    }

    #[test]
    fn test_transcript_order_preserved() {
        let mut session = Session::default();
        session.seed_system("persona");
        session.push_user("p1", "u1");
        session.push_assistant("a1");
        session.push_user("p2", "u2");
        session.push_assistant("a2");

        let roles: Vec<_> = session.messages().iter().map(|m| m.role.clone()).collect();
        assert_eq!(
            roles,
            [
                MessageRole::System,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::Assistant,
            ]
        );
        assert_eq!(session.user_inputs(), ["u1", "u2"]);
    }
}
