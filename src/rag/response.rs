//! Response selection and generation.

use super::context::{extract_context, truncate_chars, RetrievalContext};
use super::picker::{PhrasePicker, RandomPicker};
use crate::config::Responses;
use crate::dialogue::{classify_context, enhance, ContextIntent, Session};
use crate::error::Result;
use crate::intent::{self, Intent, Topic};
use crate::language::{self, Language};
use crate::retrieval::{Passage, Retriever};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Characters of context used by topic and follow-up templates.
pub const TOPIC_CONTEXT_CHARS: usize = 300;

/// Characters of context used by generic answers.
pub const GENERAL_CONTEXT_CHARS: usize = 200;

/// Confidence for answers tied to a recognised topic.
pub const TOPIC_CONFIDENCE: f32 = 0.9;

/// Confidence for general answers.
pub const GENERAL_CONFIDENCE: f32 = 0.7;

/// The outcome of a single chat turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    /// The answer text.
    pub response: String,
    /// Source of each retrieved passage, in retrieval order.
    pub sources: Vec<String>,
    /// The retrieved passages themselves, best first. Empty on failure.
    pub passages: Vec<Passage>,
    /// 0.9 for topic answers, 0.7 for general ones, 0.0 on failure.
    pub confidence: f32,
    /// Topic the message was classified as.
    pub topic: Topic,
    /// Language the answer was written for.
    pub language: Language,
}

impl ChatResponse {
    /// Whether this is the fallback produced after an internal failure.
    pub fn is_failure(&self) -> bool {
        self.confidence == 0.0
    }

    /// Format the response for display.
    pub fn format_for_display(&self) -> String {
        let mut output = self.response.clone();

        if !self.sources.is_empty() {
            output.push_str("\n\n--- Sources ---\n");
            for source in self.sources.iter().filter(|s| !s.is_empty()) {
                output.push_str(&format!("\n{}", source));
            }
        }

        output
    }
}

/// Chat engine: classifies each message and picks a response family.
pub struct ChatEngine {
    responses: Responses,
    picker: Box<dyn PhrasePicker>,
    retrieval: RetrievalContext,
}

impl ChatEngine {
    /// Create a new chat engine over `retriever`.
    pub fn new(retriever: Arc<dyn Retriever>) -> Self {
        Self {
            responses: Responses::default(),
            picker: Box::new(RandomPicker),
            retrieval: RetrievalContext::new(retriever),
        }
    }

    /// Set a custom response catalog.
    pub fn with_responses(mut self, responses: Responses) -> Self {
        self.responses = responses;
        self
    }

    /// Set how phrases are chosen among equivalent alternatives.
    pub fn with_picker(mut self, picker: impl PhrasePicker + 'static) -> Self {
        self.picker = Box::new(picker);
        self
    }

    /// Set the number of passages retrieved per turn.
    pub fn with_retrieval_k(mut self, k: usize) -> Self {
        self.retrieval = self.retrieval.with_k(k);
        self
    }

    /// Set the retrieval timeout.
    pub fn with_retrieval_timeout(mut self, timeout: Duration) -> Self {
        self.retrieval = self.retrieval.with_timeout(timeout);
        self
    }

    pub fn responses(&self) -> &Responses {
        &self.responses
    }

    /// Classify a message without touching any session.
    pub fn classify(&self, message: &str) -> Intent {
        intent::classify(message)
    }

    /// Run a full turn: retrieve passages for the context-enhanced message,
    /// then respond.
    #[instrument(skip(self, session), fields(message = %message))]
    pub async fn chat(&self, message: &str, session: &mut Session) -> ChatResponse {
        let query = enhance(message, session.history());
        if query.len() != message.len() {
            debug!("Query enhanced with conversation context");
        }

        let passages = self.retrieval.fetch(&query).await;
        self.respond(message, &passages, session)
    }

    /// Produce the response for `message` given already retrieved passages.
    ///
    /// Records the turn in `session`, except for repeat requests and failures.
    /// Never fails: internal errors become an apology with confidence 0.0.
    pub fn respond(&self, message: &str, passages: &[Passage], session: &mut Session) -> ChatResponse {
        let language = language::detect(message);
        let intent = intent::classify(message);
        info!("Topic: {}, language: {}", intent.topic, language);

        match self.generate(message, &intent, language, passages, session) {
            Ok(response) => {
                if !matches!(intent.topic, Topic::RepeatInLanguage(_)) {
                    session.update(message, &response, intent.topic);
                }

                let confidence = if intent.topic.is_general() {
                    GENERAL_CONFIDENCE
                } else {
                    TOPIC_CONFIDENCE
                };

                ChatResponse {
                    response,
                    sources: passages.iter().map(|p| p.source.clone()).collect(),
                    passages: passages.to_vec(),
                    confidence,
                    topic: intent.topic,
                    language,
                }
            }
            Err(e) => {
                warn!("Response generation failed: {}", e);
                self.failure(intent.topic, language)
            }
        }
    }

    fn failure(&self, topic: Topic, language: Language) -> ChatResponse {
        let apology = &self.responses.apology.error;
        let response = apology
            .get(language, "apology.error")
            .or_else(|_| apology.get(language.other(), "apology.error"))
            .map(str::to_string)
            .unwrap_or_else(|_| "Sorry, something went wrong.".to_string());

        ChatResponse {
            response,
            sources: Vec::new(),
            passages: Vec::new(),
            confidence: 0.0,
            topic,
            language,
        }
    }

    fn generate(
        &self,
        message: &str,
        intent: &Intent,
        language: Language,
        passages: &[Passage],
        session: &Session,
    ) -> Result<String> {
        let topic = &intent.topic;

        if let Topic::RepeatInLanguage(target) = topic {
            return self.repeat(*target, session);
        }

        if let Some(canned) = self.responses.canned(topic) {
            return Ok(canned.get(language, topic.name())?.to_string());
        }

        if let Some(template) = self.responses.template(topic) {
            let intro = template.intro.get(language, topic.name())?;
            let context = extract_context(passages);
            return if context.is_empty() {
                let fallback = template.fallback.get(language, topic.name())?;
                Ok(format!("{}{}", intro, fallback))
            } else {
                Ok(format!(
                    "{}{}...",
                    intro,
                    truncate_chars(&context, TOPIC_CONTEXT_CHARS)
                ))
            };
        }

        self.general(message, language, passages, session)
    }

    fn general(
        &self,
        message: &str,
        language: Language,
        passages: &[Passage],
        session: &Session,
    ) -> Result<String> {
        let general = &self.responses.general;
        let context = extract_context(passages);
        let context_intent = classify_context(message, session.history());
        debug!("Context intent: {}", context_intent);

        match context_intent {
            ContextIntent::FollowupQuestion => {
                if context.is_empty() {
                    Ok(general.followup_fallback.get(language, "general.followup_fallback")?.to_string())
                } else {
                    let intro = general.followup_intro.get(language, "general.followup_intro")?;
                    Ok(format!(
                        "{}{}...",
                        intro,
                        truncate_chars(&context, TOPIC_CONTEXT_CHARS)
                    ))
                }
            }
            ContextIntent::Reaction => {
                let reactions = general.reactions.get(language, "general.reactions")?;
                Ok(reactions[self.picker.pick(reactions.len())].clone())
            }
            ContextIntent::NewTopic => {
                if context.is_empty() {
                    return Ok(general.no_context.get(language, "general.no_context")?.to_string());
                }
                let prefixes = general.prefixes.get(language, "general.prefixes")?;
                let prefix = &prefixes[self.picker.pick(prefixes.len())];
                Ok(format!(
                    "{}{}...",
                    prefix,
                    truncate_chars(&context, GENERAL_CONTEXT_CHARS)
                ))
            }
        }
    }

    /// Repeat the last answer in `target`, translating through the marker
    /// table when it was given in the other language.
    fn repeat(&self, target: Language, session: &Session) -> Result<String> {
        let repeat = &self.responses.repeat;

        let Some(last) = session.last_response() else {
            return Ok(repeat.no_previous.get(target, "repeat.no_previous")?.to_string());
        };

        if language::detect(last) == target {
            return Ok(last.to_string());
        }

        // Only canned answers have a counterpart; passage-based answers may
        // mention a marker without being that text.
        let canned = session
            .last_turn()
            .is_some_and(|turn| self.responses.canned(&turn.topic).is_some());
        let translation = if canned {
            self.responses.find_translation(last)
        } else {
            None
        };

        match translation {
            Some(translation) => Ok(translation.text.get(target, "repeat.translations")?.to_string()),
            None => Ok(repeat.cannot_translate.get(target, "repeat.cannot_translate")?.to_string()),
        }
    }
}
