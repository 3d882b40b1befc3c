use std::time::Duration;

use klaro_types::{Language, LanguagePair};
use tokio_util::sync::CancellationToken;

pub mod listing;
pub mod runner;
pub mod trans;

pub use listing::parse_listing;
pub use runner::{CommandOutput, CommandRunner, ProcessRunner};
pub use trans::TransShell;

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate text for the given language pair
    async fn translate(
        &self,
        text: &str,
        pair: &LanguagePair,
        cancel: CancellationToken,
    ) -> Result<Translation, TranslateError>;

    /// Languages the provider can translate between
    async fn list_languages(
        &self,
        cancel: CancellationToken,
    ) -> Result<Vec<Language>, TranslateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub pair: LanguagePair,
    pub provider: String,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub program: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{}", tool_message(.code, .stderr))]
    ExternalTool { code: Option<i32>, stderr: String },

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Cancelled")]
    Cancelled,
}

fn tool_message(code: &Option<i32>, stderr: &str) -> String {
    match (code, stderr.is_empty()) {
        (_, false) => stderr.to_string(),
        (Some(code), true) => format!("External tool exited with status {code}"),
        (None, true) => "External tool was terminated by a signal".to_string(),
    }
}
