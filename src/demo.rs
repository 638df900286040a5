//! Canned responder used when no provider credential is configured or the
//! upstream call fails. Never fails and performs no I/O.

use rand::seq::SliceRandom;

use crate::types::{ChatMessage, NormalizedResponse};

/// Keyword table, scanned in order against the lower-cased last message;
/// first containment match wins.
const KEYWORD_REPLIES: &[(&str, &str)] = &[
    ("hello", "Hi there! I'm an AI assistant. How can I help?"),
    ("how are you", "I'm doing great, thanks for asking! How about you?"),
    (
        "joke",
        "Why do programmers prefer dark mode? Because light attracts bugs.",
    ),
    (
        "code",
        "Sure! Here's an example in Rust:\n\n```rust\nfn greet(name: &str) -> String {\n    format!(\"Hello, {name}!\")\n}\n```",
    ),
    (
        "advice",
        "**Tip of the day**: start your day with something you enjoy - a song, a walk, or a good coffee.",
    ),
    (
        "help",
        "I can help with:\n- Answering questions\n- Programming\n- Advice\n\nJust ask!",
    ),
    (
        "who are you",
        "I'm an AI assistant built to help people. Right now I'm running in demo mode.",
    ),
    ("thank", "You're welcome! Happy to help."),
    ("bye", "Goodbye! Come back any time."),
];

/// Pool drawn from uniformly when nothing in the keyword table matches.
const GENERIC_REPLIES: &[&str] = &[
    "That's an interesting question! I'm running in demo mode - configure a provider API key for full answers.",
    "Got it! My abilities are limited in demo mode. Try asking for a joke, some code, or advice!",
    "Understood! For better answers, set a Groq, Together AI or HuggingFace API key.",
    "Noted. Want to hear a joke, get some advice, or see some code?",
];

/// Produce a canned reply for the last message in the conversation.
///
/// The orchestrator guarantees `messages` is non-empty; an empty slice still
/// answers (with a generic reply) rather than panicking.
pub fn respond(messages: &[ChatMessage]) -> NormalizedResponse {
    let last = messages
        .last()
        .map(|m| m.content.to_lowercase())
        .unwrap_or_default();

    for (keyword, reply) in KEYWORD_REPLIES {
        if last.contains(keyword) {
            return NormalizedResponse::text(*reply);
        }
    }

    let reply = GENERIC_REPLIES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(GENERIC_REPLIES[0]);
    NormalizedResponse::text(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_text(content: &str) -> String {
        let response = respond(&[ChatMessage::user(content)]);
        response.content[0].text.clone()
    }

    #[test]
    fn test_every_keyword_entry_matches() {
        for (keyword, reply) in KEYWORD_REPLIES {
            // Embedded anywhere, any case.
            let content = format!("WELL {} INDEED", keyword.to_uppercase());
            assert_eq!(reply_text(&content), *reply, "keyword {keyword:?}");
        }
    }

    #[test]
    fn test_first_match_wins() {
        // "hello" precedes "joke" in the table.
        let text = reply_text("hello, tell me a joke");
        assert_eq!(text, KEYWORD_REPLIES[0].1);
    }

    #[test]
    fn test_only_last_message_is_inspected() {
        let messages = vec![
            ChatMessage::user("tell me a joke"),
            ChatMessage::assistant(KEYWORD_REPLIES[2].1),
            ChatMessage::user("hello again"),
        ];
        assert_eq!(respond(&messages).content[0].text, KEYWORD_REPLIES[0].1);
    }

    #[test]
    fn test_no_match_draws_from_generic_pool() {
        for _ in 0..20 {
            let text = reply_text("xyzzy quux");
            assert!(
                GENERIC_REPLIES.contains(&text.as_str()),
                "unexpected generic reply: {text}"
            );
        }
    }

    #[test]
    fn test_demo_never_sets_model() {
        assert!(respond(&[ChatMessage::user("hello")]).model.is_none());
        assert!(respond(&[ChatMessage::user("xyzzy")]).model.is_none());
    }

    #[test]
    fn test_round_trip_on_own_output() {
        // Feeding a generic reply back in stays well-defined; the responder
        // is stateless per call.
        for reply in GENERIC_REPLIES {
            let response = respond(&[ChatMessage::user(*reply)]);
            assert!(!response.content[0].text.is_empty());
        }
    }

    #[test]
    fn test_empty_slice_still_answers() {
        let response = respond(&[]);
        assert!(!response.content[0].text.is_empty());
    }
}
