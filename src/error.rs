//! Error types for Kapitler.

use thiserror::Error;

/// Library-level error type for Kapitler operations.
#[derive(Error, Debug)]
pub enum KapitlerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid video URL: {0}")]
    InvalidUrl(String),

    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    #[error("Chapter generation failed: {0}")]
    GenerationFailed(String),

    #[error(transparent)]
    Validation(#[from] crate::chapters::ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),
}

/// Result type alias for Kapitler operations.
pub type Result<T> = std::result::Result<T, KapitlerError>;
