//! Per-conversation state.

use crate::intent::Topic;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of turns kept in a session's history.
pub const MAX_HISTORY: usize = 10;

/// One completed exchange. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub message: String,
    pub response: String,
    pub topic: Topic,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(message: &str, response: &str, topic: Topic) -> Self {
        Self {
            message: message.to_string(),
            response: response.to_string(),
            topic,
            timestamp: Utc::now(),
        }
    }
}

/// Bounded conversation history plus the last answer given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    history: VecDeque<ConversationTurn>,
    last_response: Option<String>,
    max_history: usize,
}

impl Session {
    /// Create an empty session holding at most [`MAX_HISTORY`] turns.
    pub fn new() -> Self {
        Self::with_max_history(MAX_HISTORY)
    }

    /// Create an empty session with a smaller history bound.
    ///
    /// The bound is clamped to `1..=MAX_HISTORY`.
    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            history: VecDeque::new(),
            last_response: None,
            max_history: max_history.clamp(1, MAX_HISTORY),
        }
    }

    /// Turns in chronological order, oldest first.
    pub fn history(&self) -> &VecDeque<ConversationTurn> {
        &self.history
    }

    /// The most recent turn, if any.
    pub fn last_turn(&self) -> Option<&ConversationTurn> {
        self.history.back()
    }

    /// The most recent non-repeat response.
    pub fn last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Record a completed turn.
    ///
    /// Appends the turn, evicts the oldest entries until the bound holds and
    /// remembers `response` for later repeat requests. Call once per turn,
    /// after the response has been generated, and never for repeat requests.
    pub fn update(&mut self, message: &str, response: &str, topic: Topic) {
        self.history
            .push_back(ConversationTurn::new(message, response, topic));

        while self.history.len() > self.max_history {
            self.history.pop_front();
        }

        self.last_response = Some(response.to_string());
    }

    /// Forget all turns and the last response.
    pub fn clear(&mut self) {
        self.history.clear();
        self.last_response = None;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
