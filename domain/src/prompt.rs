//! Fixed instructions and sampling settings for context-grounded answers.

use crate::models::ChatMessage;

/// Sentence the model is told to give when the context lacks the answer.
/// Enforced only by instruction; callers must not rely on it verbatim.
pub const FALLBACK_ANSWER: &str = "The information is not available in the provided context.";

pub const SYSTEM_PROMPT: &str = "You are a knowledgeable assistant. Answer the question \
based solely on the provided context. \
If the information is not in the context, say \
'The information is not available in the provided context.'";

pub const ANSWER_TEMPERATURE: f32 = 0.2;
pub const ANSWER_MAX_TOKENS: u32 = 512;

pub fn user_message(context: &str, question: &str) -> String {
    format!("Context:\n{context}\n\nQuestion:\n{question}\n\nAnswer:")
}

/// System directive followed by the user turn carrying context and question.
pub fn grounded_messages(context: &str, question: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(user_message(context, question)),
    ]
}

/// Best-effort check for the fallback sentence. Tolerates surrounding
/// whitespace, quotes, a missing final period and letter case.
pub fn is_fallback(answer: &str) -> bool {
    let strip = |s: &str| {
        s.trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .trim()
            .trim_end_matches('.')
            .to_lowercase()
    };
    strip(answer) == strip(FALLBACK_ANSWER)
}
