//! Configuration settings for Kotae.

use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub chat: ChatSettings,
    pub retrieval: RetrievalSettings,
    pub responses: ResponseSettings,
    pub server: ServerSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level used when no `-v` flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Conversation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Turns kept per session. Values above 10 are clamped.
    pub max_history: usize,
    /// Live sessions kept by the server before the least recently used is evicted.
    pub max_sessions: usize,
    /// Seconds a session may stay idle before it is dropped.
    pub session_ttl_secs: u64,
    /// Passages requested from retrieval per turn.
    pub retrieval_k: usize,
    /// Language used for messages that are not tied to user input
    /// (e.g. REPL banners).
    pub language: Language,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            max_history: crate::dialogue::MAX_HISTORY,
            max_sessions: 1000,
            session_ttl_secs: 3600,
            retrieval_k: 3,
            language: Language::Ja,
        }
    }
}

/// Passage retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// JSON corpus of `{content, source}` passages. Built-in seed corpus if unset.
    pub corpus_path: Option<String>,
    /// Minimum relevance score (0.0-1.0).
    pub min_score: f32,
    /// Retrieval timeout in milliseconds.
    pub timeout_ms: u64,
    /// Index keywords matched between query and passage.
    pub keywords: Vec<String>,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            corpus_path: None,
            min_score: 0.0,
            timeout_ms: 5000,
            keywords: [
                "大前研一", "経営", "戦略", "グローバル", "デジタル", "リーダーシップ", "イノベーション",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
        }
    }
}

/// Response catalog customization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct ResponseSettings {
    /// Directory containing a `responses.toml` that overrides the defaults.
    pub custom_dir: Option<String>,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::KotaeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kotae")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded corpus path, if configured.
    pub fn corpus_path(&self) -> Option<PathBuf> {
        self.retrieval.corpus_path.as_deref().map(Self::expand_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.chat.max_history, 10);
        assert_eq!(settings.chat.retrieval_k, 3);
        assert_eq!(settings.server.port, 5000);
        assert!(settings.corpus_path().is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chat]\nretrieval_k = 5\nlanguage = \"en\"\n").unwrap();

        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.chat.retrieval_k, 5);
        assert_eq!(settings.chat.language, Language::En);
        assert_eq!(settings.chat.max_history, 10);
        assert_eq!(settings.retrieval.timeout_ms, 5000);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.server.port = 8080;
        settings.retrieval.corpus_path = Some("~/corpus.json".to_string());
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.server.port, 8080);
        assert!(loaded.corpus_path().unwrap().ends_with("corpus.json"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.general.log_level, "warn");
        assert_eq!(settings.chat.max_sessions, 1000);
    }
}
