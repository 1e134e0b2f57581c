//! The ordered keyword rule table.
//!
//! ORDER MATTERS. Keyword sets overlap between rules (a message can mention
//! both fear and success) and overlaps are resolved purely by position in
//! [`RULES`]: the first rule that matches decides the topic. Reordering the
//! table changes classification results.

use super::{Emotion, Topic};
use crate::language::Language;

/// A topic and emotion produced by a matching rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch {
    pub topic: Topic,
    pub emotion: Emotion,
}

/// One entry of the classification table.
#[derive(Debug)]
pub enum KeywordRule {
    /// Matches when any keyword occurs in the message.
    Topic {
        keywords: &'static [&'static str],
        topic: Topic,
        emotion: Emotion,
    },
    /// Matches when a demonstrative ("that", "それ") co-occurs with a language
    /// name. The first language keyword found selects the target language.
    Repeat {
        demonstratives: &'static [&'static str],
        languages: &'static [(&'static str, Language)],
    },
}

impl KeywordRule {
    /// Evaluate the rule against an already lower-cased message.
    pub fn evaluate(&self, lowered: &str) -> Option<RuleMatch> {
        match self {
            KeywordRule::Topic {
                keywords,
                topic,
                emotion,
            } => keywords
                .iter()
                .any(|k| lowered.contains(k))
                .then_some(RuleMatch {
                    topic: *topic,
                    emotion: *emotion,
                }),
            KeywordRule::Repeat {
                demonstratives,
                languages,
            } => {
                if !demonstratives.iter().any(|d| lowered.contains(d)) {
                    return None;
                }
                languages
                    .iter()
                    .find(|(keyword, _)| lowered.contains(keyword))
                    .map(|(_, language)| RuleMatch {
                        topic: Topic::RepeatInLanguage(*language),
                        emotion: Emotion::Neutral,
                    })
            }
        }
    }
}

/// Classification rules in priority order: fear, failure, success, business
/// strategy, leadership, global strategy, digital transformation, future
/// survival, the tracked companies, then the repeat request.
///
/// The business rule leaves out the bare words "strategy" and "戦略" so that
/// "global strategy" and "digital strategy" reach their own rules.
pub static RULES: &[KeywordRule] = &[
    KeywordRule::Topic {
        keywords: &["怖い", "恐い", "怖く", "恐く", "恐怖", "fear", "scared", "afraid"],
        topic: Topic::FearOvercoming,
        emotion: Emotion::Concern,
    },
    KeywordRule::Topic {
        keywords: &["失敗", "挫折", "困難", "failure", "difficulty", "challenge"],
        topic: Topic::FailureOvercoming,
        emotion: Emotion::Struggle,
    },
    KeywordRule::Topic {
        keywords: &["成功", "達成", "勝利", "success", "achievement", "victory"],
        topic: Topic::Success,
        emotion: Emotion::Positive,
    },
    KeywordRule::Topic {
        keywords: &["経営", "ビジネス", "企業戦略", "business", "management", "corporate"],
        topic: Topic::BusinessStrategy,
        emotion: Emotion::Neutral,
    },
    KeywordRule::Topic {
        keywords: &["リーダー", "指導", "leadership", "leader"],
        topic: Topic::Leadership,
        emotion: Emotion::Neutral,
    },
    KeywordRule::Topic {
        keywords: &["グローバル", "国際", "global", "international"],
        topic: Topic::GlobalStrategy,
        emotion: Emotion::Neutral,
    },
    KeywordRule::Topic {
        keywords: &["デジタル", "技術", "digital", "technology"],
        topic: Topic::DigitalTransformation,
        emotion: Emotion::Neutral,
    },
    KeywordRule::Topic {
        keywords: &["50", "fifty", "age", "older", "survive", "future", "2030", "2030s"],
        topic: Topic::FutureSurvival,
        emotion: Emotion::Neutral,
    },
    KeywordRule::Topic {
        keywords: &["yamaha", "ヤマハ", "motorcycle", "楽器"],
        topic: Topic::YamahaExperience,
        emotion: Emotion::Neutral,
    },
    KeywordRule::Topic {
        keywords: &["hitachi", "日立", "nuclear", "原発", "原子力"],
        topic: Topic::HitachiExperience,
        emotion: Emotion::Neutral,
    },
    KeywordRule::Topic {
        keywords: &["panasonic", "パナソニック", "松下"],
        topic: Topic::PanasonicExperience,
        emotion: Emotion::Neutral,
    },
    KeywordRule::Repeat {
        demonstratives: &["それ", "これ", "that", "this"],
        languages: &[
            ("日本語", Language::Ja),
            ("japanese", Language::Ja),
            ("英語", Language::En),
            ("english", Language::En),
        ],
    },
];
