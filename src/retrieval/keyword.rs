//! In-memory keyword retriever.
//!
//! Useful for small corpora and for testing.

use super::{Passage, Retriever};
use crate::error::{KotaeError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::sync::RwLock;
use tracing::{debug, info, instrument};

/// Minimum length of a free query word that takes part in scoring.
const MIN_TERM_CHARS: usize = 4;

#[derive(Debug, Deserialize)]
struct CorpusEntry {
    content: String,
    #[serde(default)]
    source: String,
}

/// Scores passages by how many query terms they contain.
///
/// Query terms are the configured index keywords that occur in the query plus
/// every whitespace-separated query word of at least four characters.
pub struct KeywordRetriever {
    passages: RwLock<Vec<Passage>>,
    keywords: Vec<String>,
    min_score: f32,
}

impl KeywordRetriever {
    /// Create an empty retriever.
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            passages: RwLock::new(Vec::new()),
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
            min_score: 0.0,
        }
    }

    /// Set the minimum score a passage needs to be returned.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    /// Create a retriever over the built-in seed corpus.
    pub fn with_seed_corpus(keywords: Vec<String>) -> Self {
        let retriever = Self::new(keywords);
        for (content, source) in SEED_CORPUS {
            retriever.add(content, source);
        }
        retriever
    }

    /// Load passages from a JSON file of `[{"content": ..., "source": ...}]`.
    #[instrument(skip(keywords))]
    pub fn from_json_file(path: &Path, keywords: Vec<String>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let entries: Vec<CorpusEntry> = serde_json::from_str(&content)?;

        if entries.is_empty() {
            return Err(KotaeError::Retrieval(format!(
                "Corpus {} contains no passages",
                path.display()
            )));
        }

        let retriever = Self::new(keywords);
        for entry in &entries {
            retriever.add(&entry.content, &entry.source);
        }

        info!("Loaded {} passages from {}", entries.len(), path.display());
        Ok(retriever)
    }

    /// Add a passage to the index.
    pub fn add(&self, content: &str, source: &str) {
        let mut passages = self.passages.write().unwrap();
        passages.push(Passage::new(content, source, 0.0));
    }

    fn query_terms(&self, query: &str) -> Vec<String> {
        let lowered = query.to_lowercase();

        let mut terms: Vec<String> = self
            .keywords
            .iter()
            .filter(|k| lowered.contains(k.as_str()))
            .cloned()
            .collect();

        for word in lowered.split_whitespace() {
            let word = word.trim_matches(|c: char| !c.is_alphanumeric());
            if word.chars().count() >= MIN_TERM_CHARS && !terms.iter().any(|t| t == word) {
                terms.push(word.to_string());
            }
        }

        terms
    }
}

#[async_trait]
impl Retriever for KeywordRetriever {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Passage>> {
        let terms = self.query_terms(query);
        if terms.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let passages = self.passages.read().unwrap();

        let mut results: Vec<Passage> = passages
            .iter()
            .map(|passage| {
                let content = passage.content.to_lowercase();
                let hits = terms.iter().filter(|t| content.contains(t.as_str())).count();
                Passage {
                    score: hits as f32 / terms.len() as f32,
                    ..passage.clone()
                }
            })
            .filter(|p| p.score > 0.0 && p.score >= self.min_score)
            .collect();

        // Stable sort keeps corpus order among equal scores
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);

        debug!("{} terms, {} passages matched", terms.len(), results.len());
        Ok(results)
    }

    async fn passage_count(&self) -> Result<usize> {
        let passages = self.passages.read().unwrap();
        Ok(passages.len())
    }
}

/// Passages available when no corpus file is configured.
const SEED_CORPUS: &[(&str, &str)] = &[
    (
        "大前研一は、日本の経営コンサルタントであり、グローバル戦略の専門家です。企業のグローバル化戦略について多くの洞察を提供しています。",
        "大前研一の経営論",
    ),
    (
        "グローバル化の時代において、企業は国境を越えた競争に直面しています。大前研一は、このような環境での成功要因を分析しています。",
        "グローバル戦略論",
    ),
    (
        "デジタル技術の進歩により、ビジネスモデルは大きく変化しています。大前研一は、デジタル時代の経営について重要な指摘をしています。",
        "デジタル経営論",
    ),
    (
        "リーダーシップの本質は、変化する環境に対応する能力にあります。大前研一は、現代のリーダーに求められる資質について論じています。",
        "リーダーシップ論",
    ),
    (
        "イノベーションは、既存の枠組みを超える思考から生まれます。大前研一は、創造的破壊の重要性を強調しています。",
        "イノベーション論",
    ),
    (
        "In a borderless world, companies must think globally about customers, competitors and their own corporation. Ohmae's strategic triangle connects all three.",
        "The Mind of the Strategist",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> Vec<String> {
        vec!["経営".to_string(), "グローバル".to_string(), "デジタル".to_string()]
    }

    #[tokio::test]
    async fn test_seed_corpus_search() {
        let retriever = KeywordRetriever::with_seed_corpus(keywords());
        assert_eq!(retriever.passage_count().await.unwrap(), SEED_CORPUS.len());

        let results = retriever.search("グローバル経営について", 3).await.unwrap();
        assert!(!results.is_empty());
        assert!(results.len() <= 3);
        assert_eq!(results[0].source, "大前研一の経営論");
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn test_free_words_are_terms() {
        let retriever = KeywordRetriever::with_seed_corpus(Vec::new());
        let results = retriever.search("What is a borderless world?", 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source, "The Mind of the Strategist");
    }

    #[tokio::test]
    async fn test_no_terms_no_results() {
        let retriever = KeywordRetriever::with_seed_corpus(keywords());
        assert!(retriever.search("hi", 3).await.unwrap().is_empty());
        assert!(retriever.search("グローバル", 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_min_score_filters() {
        let retriever = KeywordRetriever::new(keywords()).with_min_score(0.9);
        retriever.add("経営の話", "a");
        retriever.add("経営とグローバルの話", "b");

        let results = retriever.search("経営 グローバル", 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source, "b");
    }

    #[tokio::test]
    async fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        std::fs::write(
            &path,
            r#"[{"content": "デジタル変革の本質", "source": "book"}, {"content": "no source here"}]"#,
        )
        .unwrap();

        let retriever = KeywordRetriever::from_json_file(&path, keywords()).unwrap();
        assert_eq!(retriever.passage_count().await.unwrap(), 2);

        let results = retriever.search("デジタル", 3).await.unwrap();
        assert_eq!(results[0].source, "book");
    }

    #[test]
    fn test_empty_corpus_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(KeywordRetriever::from_json_file(&path, keywords()).is_err());
    }
}
