use std::time::Duration;

use klaro_translator::TranslateError;
use klaro_types::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to list languages: {0}")]
    Tool(#[from] TranslateError),

    #[error("Language listing contained no usable lines")]
    Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("Unknown target language: {0}")]
    InvalidTargetLanguage(String),

    #[error("Unknown source language: {0}")]
    InvalidSourceLanguage(String),

    #[error("Translation failed: {0}")]
    ExternalToolError(String),

    #[error("Translation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Translation cancelled")]
    Cancelled,
}

impl From<TranslateError> for TranslationError {
    fn from(err: TranslateError) -> Self {
        match err {
            TranslateError::Timeout(after) => Self::Timeout(after),
            TranslateError::Cancelled => Self::Cancelled,
            other => Self::ExternalToolError(other.to_string()),
        }
    }
}

impl TranslationError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::InvalidTargetLanguage(_) => Some(ErrorKind::InvalidTargetLanguage),
            Self::InvalidSourceLanguage(_) => Some(ErrorKind::InvalidSourceLanguage),
            Self::ExternalToolError(_) => Some(ErrorKind::ExternalTool),
            Self::Timeout(_) => Some(ErrorKind::Timeout),
            // User initiated, not shown as an error
            Self::Cancelled => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("No configuration directory available on this platform")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}
