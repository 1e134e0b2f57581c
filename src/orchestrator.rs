//! Component wiring for Kotae.
//!
//! Builds the retriever, response catalog, chat engine and session store from
//! settings, and runs turns against stored sessions.

use crate::config::{Responses, Settings};
use crate::dialogue::{Session, SessionStore};
use crate::error::{KotaeError, Result};
use crate::rag::{ChatEngine, ChatResponse};
use crate::retrieval::{KeywordRetriever, Retriever};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

/// The main orchestrator for Kotae.
pub struct Orchestrator {
    settings: Settings,
    engine: ChatEngine,
    retriever: Arc<dyn Retriever>,
    sessions: SessionStore,
}

impl Orchestrator {
    /// Create a new orchestrator from settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let retriever: Arc<dyn Retriever> = Arc::new(Self::build_retriever(&settings)?);
        Self::with_retriever(settings, retriever)
    }

    /// Create an orchestrator around an existing retriever.
    pub fn with_retriever(settings: Settings, retriever: Arc<dyn Retriever>) -> Result<Self> {
        let responses = Responses::load(settings.responses.custom_dir.as_deref())?;

        let engine = ChatEngine::new(retriever.clone())
            .with_responses(responses)
            .with_retrieval_k(settings.chat.retrieval_k)
            .with_retrieval_timeout(Duration::from_millis(settings.retrieval.timeout_ms));

        let sessions = SessionStore::new(settings.chat.max_history)
            .with_max_sessions(settings.chat.max_sessions)
            .with_ttl(Duration::from_secs(settings.chat.session_ttl_secs));

        Ok(Self {
            settings,
            engine,
            retriever,
            sessions,
        })
    }

    fn build_retriever(settings: &Settings) -> Result<KeywordRetriever> {
        let keywords = settings.retrieval.keywords.clone();

        let retriever = match settings.corpus_path() {
            Some(path) => {
                if !path.exists() {
                    return Err(KotaeError::Config(format!(
                        "Corpus file not found: {}",
                        path.display()
                    )));
                }
                KeywordRetriever::from_json_file(&path, keywords)?
            }
            None => {
                info!("No corpus configured, using the built-in seed corpus");
                KeywordRetriever::with_seed_corpus(keywords)
            }
        };

        Ok(retriever.with_min_score(settings.retrieval.min_score))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn engine(&self) -> &ChatEngine {
        &self.engine
    }

    pub fn retriever(&self) -> Arc<dyn Retriever> {
        self.retriever.clone()
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// A fresh session honouring the configured history bound (at most
    /// [`MAX_HISTORY`](crate::dialogue::MAX_HISTORY)).
    pub fn new_session(&self) -> Session {
        Session::with_max_history(self.settings.chat.max_history)
    }

    /// Run one turn against a stored session, creating it when needed.
    ///
    /// The session stays locked for the whole turn.
    #[instrument(skip(self, message))]
    pub async fn chat(&self, session_id: Option<Uuid>, message: &str) -> Result<(Uuid, ChatResponse)> {
        let message = message.trim();
        if message.is_empty() {
            return Err(KotaeError::InvalidInput("Message is empty".to_string()));
        }

        let (id, handle) = self.sessions.get_or_create(session_id);
        let mut session = handle.lock().await;
        let response = self.engine.chat(message, &mut session).await;

        Ok((id, response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::Topic;

    #[tokio::test]
    async fn test_default_orchestrator_chat() {
        let orchestrator = Orchestrator::new(Settings::default()).unwrap();
        assert!(orchestrator.retriever().passage_count().await.unwrap() > 0);

        let (id, first) = orchestrator.chat(None, "グローバル戦略とは？").await.unwrap();
        assert_eq!(first.topic, Topic::GlobalStrategy);
        assert!(!first.sources.is_empty());

        let (same, _) = orchestrator.chat(Some(id), "なるほど").await.unwrap();
        assert_eq!(same, id);

        let handle = orchestrator.sessions().get(&id).unwrap();
        assert_eq!(handle.lock().await.history().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let orchestrator = Orchestrator::new(Settings::default()).unwrap();
        let err = orchestrator.chat(None, "   ").await.unwrap_err();
        assert!(matches!(err, KotaeError::InvalidInput(_)));
        assert!(orchestrator.sessions().is_empty());
    }

    #[test]
    fn test_missing_corpus_is_config_error() {
        let mut settings = Settings::default();
        settings.retrieval.corpus_path = Some("/nonexistent/corpus.json".to_string());
        assert!(matches!(
            Orchestrator::new(settings),
            Err(KotaeError::Config(_))
        ));
    }

    #[test]
    fn test_new_session_uses_configured_bound() {
        let mut settings = Settings::default();
        settings.chat.max_history = 4;
        let orchestrator = Orchestrator::new(settings).unwrap();
        assert_eq!(orchestrator.new_session().max_history(), 4);
    }

    #[tokio::test]
    async fn test_oversized_history_setting_keeps_bound() {
        let mut settings = Settings::default();
        settings.chat.max_history = 50;
        let orchestrator = Orchestrator::new(settings).unwrap();

        let (id, _) = orchestrator.chat(None, "hello").await.unwrap();
        for i in 0..30 {
            orchestrator.chat(Some(id), &format!("question {}", i)).await.unwrap();
        }

        let handle = orchestrator.sessions().get(&id).unwrap();
        assert_eq!(handle.lock().await.history().len(), crate::dialogue::MAX_HISTORY);
    }

    #[tokio::test]
    async fn test_anonymous_chats_respect_session_cap() {
        let mut settings = Settings::default();
        settings.chat.max_sessions = 5;
        let orchestrator = Orchestrator::new(settings).unwrap();

        for _ in 0..20 {
            orchestrator.chat(None, "hello").await.unwrap();
        }
        assert_eq!(orchestrator.sessions().len(), 5);
    }
}
