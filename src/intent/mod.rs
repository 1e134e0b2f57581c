//! Intent classification for incoming messages.
//!
//! A message is mapped to a topic and an emotion by walking an ordered list of
//! keyword rules (see [`rules`]). The first rule that matches wins.

pub mod rules;

pub use rules::{KeywordRule, RuleMatch, RULES};

use crate::language::Language;
use serde::{Deserialize, Serialize};

/// The subject of a user message, used to select a response family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "topic", content = "language")]
pub enum Topic {
    General,
    FearOvercoming,
    FailureOvercoming,
    Success,
    BusinessStrategy,
    Leadership,
    GlobalStrategy,
    DigitalTransformation,
    FutureSurvival,
    YamahaExperience,
    HitachiExperience,
    PanasonicExperience,
    /// Repeat the previous answer in the given language.
    RepeatInLanguage(Language),
}

impl Topic {
    /// Stable snake_case name, used as the catalog key.
    pub fn name(&self) -> &'static str {
        match self {
            Topic::General => "general",
            Topic::FearOvercoming => "fear_overcoming",
            Topic::FailureOvercoming => "failure_overcoming",
            Topic::Success => "success",
            Topic::BusinessStrategy => "business_strategy",
            Topic::Leadership => "leadership",
            Topic::GlobalStrategy => "global_strategy",
            Topic::DigitalTransformation => "digital_transformation",
            Topic::FutureSurvival => "future_survival",
            Topic::YamahaExperience => "yamaha_experience",
            Topic::HitachiExperience => "hitachi_experience",
            Topic::PanasonicExperience => "panasonic_experience",
            Topic::RepeatInLanguage(_) => "repeat_in_language",
        }
    }

    pub fn is_general(&self) -> bool {
        matches!(self, Topic::General)
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Topic::RepeatInLanguage(lang) => write!(f, "repeat_in_language({})", lang),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// The emotional tone associated with a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    #[default]
    Neutral,
    Concern,
    Struggle,
    Positive,
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Emotion::Neutral => "neutral",
            Emotion::Concern => "concern",
            Emotion::Struggle => "struggle",
            Emotion::Positive => "positive",
        };
        write!(f, "{}", name)
    }
}

/// How specific a question is. Only `General` is produced today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Specificity {
    #[default]
    General,
}

/// The classified intent of a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub topic: Topic,
    pub emotion: Emotion,
    pub specificity: Specificity,
}

impl Default for Intent {
    fn default() -> Self {
        Self {
            topic: Topic::General,
            emotion: Emotion::Neutral,
            specificity: Specificity::General,
        }
    }
}

/// Classify a message into an [`Intent`].
///
/// Matching is case-insensitive substring containment over [`RULES`], in order.
pub fn classify(message: &str) -> Intent {
    let lowered = message.to_lowercase();

    RULES
        .iter()
        .find_map(|rule| rule.evaluate(&lowered))
        .map(|m| Intent {
            topic: m.topic,
            emotion: m.emotion,
            specificity: Specificity::General,
        })
        .unwrap_or_default()
}
