//! Error types for Scribe.

use thiserror::Error;

/// Library-level error type for Scribe operations.
#[derive(Error, Debug)]
pub enum ScribeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Plan store error: {0}")]
    PlanStore(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Web search failed: {0}")]
    Search(String),

    #[error("Scraper error: {0}")]
    Scraper(String),

    #[error("Research plan not found: {0}")]
    PlanNotFound(i64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Scribe operations.
pub type Result<T> = std::result::Result<T, ScribeError>;
