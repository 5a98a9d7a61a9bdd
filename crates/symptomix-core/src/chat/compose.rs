//! Query composition and prompt assembly.
//!
//! Two deliberately distinct transformations that must not be collapsed:
//! the retrieval query concatenates the session's raw user inputs so that
//! follow-up questions ("what about its dosage?") retrieve correctly, while
//! the generation prompt embeds the retrieved passages around only the
//! latest input. Collapsing them silently changes retrieval quality.

use symptomix_types::retrieval::Passage;

/// Compose the similarity-search query for a turn.
///
/// All prior raw user inputs in arrival order, then the new input,
/// single-space-joined -- never reordered, deduplicated, or truncated. For
/// a fresh session this degenerates to the new input alone. Growth over a
/// session's lifetime is unbounded; that is the accepted cost of the
/// full-history heuristic.
pub fn retrieval_query(prior_inputs: &[String], new_input: &str) -> String {
    let mut parts: Vec<&str> = prior_inputs.iter().map(String::as_str).collect();
    parts.push(new_input);
    parts.join(" ")
}

/// Assemble the generation-side user message for a turn.
///
/// The retrieved passages are concatenated with blank-line separators under
/// a `Context:` header, followed by the user's original text under
/// `Question:`. With zero passages the context block is empty but the frame
/// is kept, so the grounding instruction in the system prompt still applies.
pub fn grounded_prompt(passages: &[Passage], user_text: &str) -> String {
    let context = passages
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("Context:\n{context}\n\nQuestion: {user_text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_query_degenerates_to_input() {
        assert_eq!(retrieval_query(&[], "What is metformin?"), "What is metformin?");
    }

    #[test]
    fn test_retrieval_query_preserves_arrival_order() {
        let prior = vec!["u1".to_string(), "u2".to_string()];
        assert_eq!(retrieval_query(&prior, "u3"), "u1 u2 u3");
    }

    #[test]
    fn test_retrieval_query_never_deduplicates() {
        let prior = vec!["hello".to_string(), "hello".to_string()];
        assert_eq!(retrieval_query(&prior, "hello"), "hello hello hello");
    }

    #[test]
    fn test_grounded_prompt_embeds_passages_and_question() {
        let passages = vec![
            Passage::new("Metformin is a biguanide."),
            Passage::new("Typical dose is 500mg."),
        ];
        let prompt = grounded_prompt(&passages, "What is its common dosage?");
        assert_eq!(
            prompt,
            "Context:\nMetformin is a biguanide.\n\nTypical dose is 500mg.\n\nQuestion: What is its common dosage?"
        );
    }

    #[test]
    fn test_grounded_prompt_keeps_frame_without_passages() {
        let prompt = grounded_prompt(&[], "Hi there");
        assert_eq!(prompt, "Context:\n\n\nQuestion: Hi there");
    }
}
