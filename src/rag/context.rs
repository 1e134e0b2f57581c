//! Passage fetching and context extraction.

use crate::retrieval::{Passage, Retriever};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Characters taken from each passage when building context.
pub const PASSAGE_CHARS: usize = 500;

/// Fetches passages for a query, never failing.
///
/// Retrieval errors and timeouts are logged and reported as "no passages".
pub struct RetrievalContext {
    retriever: Arc<dyn Retriever>,
    k: usize,
    timeout: Duration,
}

impl RetrievalContext {
    /// Create a new retrieval context.
    pub fn new(retriever: Arc<dyn Retriever>) -> Self {
        Self {
            retriever,
            k: 3,
            timeout: Duration::from_secs(5),
        }
    }

    /// Set the number of passages requested per query.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set how long to wait for the retriever.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch passages for `query`, best first.
    pub async fn fetch(&self, query: &str) -> Vec<Passage> {
        match tokio::time::timeout(self.timeout, self.retriever.search(query, self.k)).await {
            Ok(Ok(mut passages)) => {
                passages.truncate(self.k);
                debug!("Retrieved {} passages", passages.len());
                passages
            }
            Ok(Err(e)) => {
                warn!("Retrieval failed, continuing without passages: {}", e);
                Vec::new()
            }
            Err(_) => {
                warn!("Retrieval timed out after {:?}, continuing without passages", self.timeout);
                Vec::new()
            }
        }
    }
}

/// Longest prefix of `text` with at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Concatenate the first [`PASSAGE_CHARS`] characters of each passage,
/// separated by blank lines. Empty when there are no passages.
pub fn extract_context(passages: &[Passage]) -> String {
    passages
        .iter()
        .map(|p| truncate_chars(&p.content, PASSAGE_CHARS))
        .collect::<Vec<_>>()
        .join("\n\n")
}
