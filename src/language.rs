//! Script-based language detection.
//!
//! Any Hiragana, Katakana or CJK ideograph marks a message as Japanese,
//! everything else is treated as English.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// The two languages the chatbot answers in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Japanese, the primary language.
    #[serde(alias = "primary")]
    Ja,
    /// English, the fallback language.
    #[default]
    #[serde(alias = "fallback")]
    En,
}

impl Language {
    /// The language the other side of a bilingual pair is written in.
    pub fn other(self) -> Self {
        match self {
            Language::Ja => Language::En,
            Language::En => Language::Ja,
        }
    }

    /// Short language code.
    pub fn code(self) -> &'static str {
        match self {
            Language::Ja => "ja",
            Language::En => "en",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ja" | "japanese" | "primary" => Ok(Language::Ja),
            "en" | "english" | "fallback" => Ok(Language::En),
            _ => Err(format!("Unknown language: {}", s)),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Detects the language of a piece of text by script presence.
pub struct LanguageDetector {
    japanese_script: Regex,
}

impl LanguageDetector {
    pub fn new() -> Self {
        // Hiragana, Katakana, CJK Unified Ideographs
        let japanese_script = Regex::new("[\u{3040}-\u{309F}\u{30A0}-\u{30FF}\u{4E00}-\u{9FAF}]")
            .expect("Invalid regex");

        Self { japanese_script }
    }

    /// Classify `text`. Never fails; text without Japanese script is English.
    pub fn detect(&self, text: &str) -> Language {
        if self.japanese_script.is_match(text) {
            Language::Ja
        } else {
            Language::En
        }
    }
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect the language of `text` using a shared detector.
pub fn detect(text: &str) -> Language {
    static DETECTOR: OnceLock<LanguageDetector> = OnceLock::new();
    DETECTOR.get_or_init(LanguageDetector::new).detect(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_latin_only() {
        assert_eq!(detect("What is global strategy?"), Language::En);
        assert_eq!(detect("Thanks, that makes sense"), Language::En);
        assert_eq!(detect(""), Language::En);
    }

    #[test]
    fn test_detect_each_script() {
        assert_eq!(detect("ありがとう"), Language::Ja);
        assert_eq!(detect("ヤマハ"), Language::Ja);
        assert_eq!(detect("経営"), Language::Ja);
        assert_eq!(detect("Tell me about ヤマハ please"), Language::Ja);
        assert_eq!(detect("2030s 50代?"), Language::Ja);
    }

    #[test]
    fn test_fullwidth_punctuation_is_not_japanese() {
        // U+3001 and U+FF1F sit outside the kana and ideograph ranges
        assert_eq!(detect("、？"), Language::En);
    }

    #[test]
    fn test_language_parse_and_other() {
        assert_eq!("primary".parse::<Language>().unwrap(), Language::Ja);
        assert_eq!("English".parse::<Language>().unwrap(), Language::En);
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::Ja.other(), Language::En);
        assert_eq!(Language::En.to_string(), "en");
    }
}
