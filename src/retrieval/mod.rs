//! Passage retrieval for Kotae.
//!
//! Provides a trait-based interface so the chat engine does not depend on a
//! particular index. Results are ordered best-first.

mod keyword;

pub use keyword::KeywordRetriever;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A retrieved text snippet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Passage {
    /// Text content.
    pub content: String,
    /// Where the passage came from (book title, file name). May be empty.
    #[serde(default)]
    pub source: String,
    /// Relevance score (higher is better).
    #[serde(default)]
    pub score: f32,
}

impl Passage {
    pub fn new(content: impl Into<String>, source: impl Into<String>, score: f32) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            score,
        }
    }
}

/// Trait for retrieval backends.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return at most `k` passages relevant to `query`, best first.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Passage>>;

    /// Number of passages available to search.
    async fn passage_count(&self) -> Result<usize>;
}
