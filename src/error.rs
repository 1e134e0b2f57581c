//! Error types for Kotae.

use thiserror::Error;

/// Library-level error type for Kotae operations.
#[derive(Error, Debug)]
pub enum KotaeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("No {language} response configured for '{key}'")]
    MissingResponse { key: String, language: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for Kotae operations.
pub type Result<T> = std::result::Result<T, KotaeError>;
