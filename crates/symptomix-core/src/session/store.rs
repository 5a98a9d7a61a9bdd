//! In-memory session store.
//!
//! Process-wide registry mapping a caller-supplied `chat_id` to its
//! [`Session`]. Sessions are created lazily on first use, destroyed only by
//! an explicit reset, and otherwise live for the lifetime of the process --
//! there is no TTL or eviction. The store is the sole owner of all session
//! state; callers get snapshots, never references.
//!
//! DashMap's per-entry locking keeps transcript structure sound when turns
//! race on the same `chat_id`; interleaving order across racing turns is
//! not defined beyond that.

use dashmap::DashMap;

use symptomix_types::chat::Session;
use symptomix_types::llm::Message;

/// Process-wide mapping from `chat_id` to session transcript.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Ensure a session entry exists for `chat_id`, creating an empty one
    /// if absent. Never fails for a non-empty `chat_id`.
    pub fn get_or_create(&self, chat_id: &str) {
        self.sessions.entry(chat_id.to_string()).or_default();
    }

    /// Remove the session if present; a no-op (not an error) if absent.
    pub fn reset(&self, chat_id: &str) {
        self.sessions.remove(chat_id);
    }

    /// Whether a session entry exists (empty or not).
    pub fn contains(&self, chat_id: &str) -> bool {
        self.sessions.contains_key(chat_id)
    }

    /// Number of session entries currently held.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the session is absent or has an empty transcript.
    ///
    /// A session with zero messages is equivalent to a non-existent one.
    pub fn is_empty_session(&self, chat_id: &str) -> bool {
        self.sessions
            .get(chat_id)
            .map(|s| s.is_empty())
            .unwrap_or(true)
    }

    /// Snapshot of the session's transcript, empty if absent.
    pub fn transcript(&self, chat_id: &str) -> Vec<Message> {
        self.sessions
            .get(chat_id)
            .map(|s| s.messages().to_vec())
            .unwrap_or_default()
    }

    /// Snapshot of the raw user inputs in arrival order, empty if absent.
    pub fn user_inputs(&self, chat_id: &str) -> Vec<String> {
        self.sessions
            .get(chat_id)
            .map(|s| s.user_inputs().to_vec())
            .unwrap_or_default()
    }

    /// Seed the single system message iff the transcript is empty.
    ///
    /// Assumes the session exists (created via [`Self::get_or_create`] in
    /// the same turn); creates it otherwise so the seed cannot be lost to a
    /// racing reset.
    pub fn seed_system(&self, chat_id: &str, content: &str) {
        self.sessions
            .entry(chat_id.to_string())
            .or_default()
            .seed_system(content);
    }

    /// Append a user turn and return the transcript snapshot including it.
    ///
    /// `prompt` is the context-augmented content put on the transcript;
    /// `raw_input` is the user's original text, logged for retrieval-query
    /// composition.
    pub fn append_user(&self, chat_id: &str, prompt: String, raw_input: String) -> Vec<Message> {
        let mut session = self.sessions.entry(chat_id.to_string()).or_default();
        session.push_user(prompt, raw_input);
        session.messages().to_vec()
    }

    /// Append an assistant turn.
    pub fn append_assistant(&self, chat_id: &str, content: String) {
        self.sessions
            .entry(chat_id.to_string())
            .or_default()
            .push_assistant(content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use symptomix_types::chat::MessageRole;

    #[test]
    fn test_get_or_create_is_idempotent() {
        let store = SessionStore::new();
        store.get_or_create("s1");
        store.get_or_create("s1");
        assert_eq!(store.session_count(), 1);
        assert!(store.is_empty_session("s1"));
    }

    #[test]
    fn test_reset_is_idempotent_and_tolerates_absent() {
        let store = SessionStore::new();
        store.reset("never-seen");
        store.get_or_create("s1");
        store.append_user("s1", "p".into(), "u".into());
        store.reset("s1");
        store.reset("s1");
        assert!(!store.contains("s1"));
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn test_append_user_returns_snapshot_including_turn() {
        let store = SessionStore::new();
        store.get_or_create("s1");
        store.seed_system("s1", "persona");
        let messages = store.append_user("s1", "prompt".into(), "raw".into());
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[1].content, "prompt");
    }

    #[test]
    fn test_user_inputs_preserve_arrival_order() {
        let store = SessionStore::new();
        store.get_or_create("s1");
        store.append_user("s1", "p1".into(), "u1".into());
        store.append_assistant("s1", "a1".into());
        store.append_user("s1", "p2".into(), "u2".into());
        assert_eq!(store.user_inputs("s1"), ["u1", "u2"]);
    }

    #[test]
    fn test_sessions_are_independent() {
        let store = SessionStore::new();
        store.get_or_create("a");
        store.get_or_create("b");
        store.append_user("a", "p".into(), "u".into());
        assert_eq!(store.transcript("a").len(), 1);
        assert!(store.transcript("b").is_empty());
        store.reset("a");
        assert!(store.contains("b"));
    }

    #[test]
    fn test_seed_system_once_per_session() {
        let store = SessionStore::new();
        store.get_or_create("s1");
        store.seed_system("s1", "persona");
        store.append_user("s1", "p".into(), "u".into());
        store.seed_system("s1", "other");

        let transcript = store.transcript("s1");
        let system_count = transcript
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .count();
        assert_eq!(system_count, 1);
        assert_eq!(transcript[0].content, "persona");
    }

    #[test]
    fn test_concurrent_appends_do_not_corrupt_transcript() {
        let store = Arc::new(SessionStore::new());
        store.get_or_create("s1");

        let mut handles = Vec::new();
        for worker in 0..8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for i in 0..50 {
                    store.append_user("s1", format!("p{worker}-{i}"), format!("u{worker}-{i}"));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.transcript("s1").len(), 400);
        assert_eq!(store.user_inputs("s1").len(), 400);
    }
}
