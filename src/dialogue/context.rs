//! Conversation context tracking.
//!
//! Both operations here only read the history; recording a turn is
//! [`Session::update`](super::Session::update).

use super::ConversationTurn;
use crate::rag::truncate_chars;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// How many recent turns are folded into an enhanced message.
pub const CONTEXT_WINDOW: usize = 3;

/// Characters of a previous answer quoted in an enhanced message.
pub const PREVIOUS_ANSWER_CHARS: usize = 200;

/// Patterns marking a follow-up to the previous turn. Checked before
/// [`REACTION_PATTERNS`].
pub const FOLLOWUP_PATTERNS: &[&str] = &[
    "それって", "それは", "その", "これって", "これは", "この",
    "that", "this", "it", "what about", "how about",
    "詳しく", "具体的に", "例を", "for example", "specifically",
    "なぜ", "どうして", "why", "how come",
    "他には", "他に", "other", "else", "more",
];

/// Acknowledgement and gratitude patterns.
pub const REACTION_PATTERNS: &[&str] = &[
    "なるほど", "そうですね", "確かに", "理解しました",
    "i see", "i understand", "that makes sense", "okay",
    "ありがとう", "thank you", "thanks",
    "もっと", "さらに", "more", "further",
];

/// How a message relates to the previous turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextIntent {
    NewTopic,
    FollowupQuestion,
    Reaction,
}

impl std::fmt::Display for ContextIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ContextIntent::NewTopic => "new_topic",
            ContextIntent::FollowupQuestion => "followup_question",
            ContextIntent::Reaction => "reaction",
        };
        write!(f, "{}", name)
    }
}

/// Append the recent on-topic history to `message`.
///
/// Only the last [`CONTEXT_WINDOW`] turns are considered and turns whose
/// topic was `general` are skipped. Returns `message` unchanged when nothing
/// qualifies.
pub fn enhance(message: &str, history: &VecDeque<ConversationTurn>) -> String {
    if history.is_empty() {
        return message.to_string();
    }

    let skip = history.len().saturating_sub(CONTEXT_WINDOW);
    let context_lines: Vec<String> = history
        .iter()
        .skip(skip)
        .filter(|turn| !turn.topic.is_general())
        .flat_map(|turn| {
            [
                format!("Previous question: {}", turn.message),
                format!(
                    "Previous answer: {}...",
                    truncate_chars(&turn.response, PREVIOUS_ANSWER_CHARS)
                ),
            ]
        })
        .collect();

    if context_lines.is_empty() {
        return message.to_string();
    }

    format!("{}\n\n--- Context ---\n{}", message, context_lines.join("\n"))
}

/// Decide whether `message` starts a new topic, follows up on the previous
/// turn, or reacts to it.
pub fn classify_context(message: &str, history: &VecDeque<ConversationTurn>) -> ContextIntent {
    let Some(last) = history.back() else {
        return ContextIntent::NewTopic;
    };

    debug!("Previous turn topic: {}", last.topic);

    let lowered = message.to_lowercase();

    if FOLLOWUP_PATTERNS.iter().any(|p| lowered.contains(p)) {
        return ContextIntent::FollowupQuestion;
    }

    if REACTION_PATTERNS.iter().any(|p| lowered.contains(p)) {
        return ContextIntent::Reaction;
    }

    ContextIntent::NewTopic
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::Session;
    use crate::intent::Topic;

    #[test]
    fn test_enhance_empty_history_is_identity() {
        let history = VecDeque::new();
        assert_eq!(enhance("それについて詳しく", &history), "それについて詳しく");
    }

    #[test]
    fn test_enhance_skips_general_turns() {
        let mut session = Session::new();
        session.update("hello", "hi", Topic::General);
        assert_eq!(enhance("next", session.history()), "next");
    }

    #[test]
    fn test_enhance_appends_recent_topics() {
        let mut session = Session::new();
        session.update("経営とは", &"戦".repeat(300), Topic::BusinessStrategy);

        let enhanced = enhance("それについて詳しく", session.history());
        assert!(enhanced.starts_with("それについて詳しく\n\n--- Context ---\n"));
        assert!(enhanced.contains("Previous question: 経営とは"));
        assert!(enhanced.contains(&format!("Previous answer: {}...", "戦".repeat(200))));
        assert!(!enhanced.contains(&"戦".repeat(201)));
    }

    #[test]
    fn test_enhance_only_looks_at_last_three() {
        let mut session = Session::new();
        session.update("oldest", "a", Topic::Leadership);
        session.update("second", "b", Topic::General);
        session.update("third", "c", Topic::General);
        session.update("newest", "d", Topic::Success);

        let enhanced = enhance("m", session.history());
        assert!(enhanced.contains("newest"));
        assert!(!enhanced.contains("oldest"));
    }

    #[test]
    fn test_classify_context_without_history() {
        let history = VecDeque::new();
        assert_eq!(classify_context("thanks", &history), ContextIntent::NewTopic);
        assert_eq!(classify_context("why?", &history), ContextIntent::NewTopic);
    }

    #[test]
    fn test_classify_context_followup_scenario() {
        let mut session = Session::new();
        session.update("経営とは", "経営の答え", Topic::BusinessStrategy);

        assert_eq!(
            classify_context("それについて詳しく", session.history()),
            ContextIntent::FollowupQuestion
        );
    }

    #[test]
    fn test_followup_checked_before_reaction() {
        let mut session = Session::new();
        session.update("q", "a", Topic::General);

        // "more" is in both pattern sets
        assert_eq!(classify_context("more", session.history()), ContextIntent::FollowupQuestion);
        assert_eq!(classify_context("なるほど", session.history()), ContextIntent::Reaction);
        assert_eq!(classify_context("Thanks!", session.history()), ContextIntent::Reaction);
        assert_eq!(classify_context("経営", session.history()), ContextIntent::NewTopic);
    }
}
