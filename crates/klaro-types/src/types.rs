use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type LanguageCode = String;

/// Label of the synthetic catalog entry that lets the tool detect the source
pub const AUTO_DETECT: &str = "Auto detect";

/// One language as reported by the external tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: LanguageCode,
    pub english_name: String,
    pub native_name: String,
}

impl Language {
    pub fn new(
        code: impl Into<String>,
        english_name: impl Into<String>,
        native_name: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            english_name: english_name.into(),
            native_name: native_name.into(),
        }
    }

    /// Name shown to the user for the given display mode
    pub fn display_name(&self, use_english_names: bool) -> &str {
        if use_english_names {
            &self.english_name
        } else {
            &self.native_name
        }
    }
}

/// Source/target codes handed to the tool. A missing source means auto detect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    pub from: Option<LanguageCode>,
    pub to: LanguageCode,
}

impl LanguagePair {
    pub fn new(from: Option<LanguageCode>, to: LanguageCode) -> Self {
        Self { from, to }
    }

    /// `<from>:<to>`, or `:<to>` when the source is omitted
    pub fn to_arg(&self) -> String {
        format!("{}:{}", self.from.as_deref().unwrap_or(""), self.to)
    }
}

#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub id: Uuid,
    pub text: String,
    /// Display name of the source language, or [`AUTO_DETECT`]
    pub from: String,
    /// Display name of the target language
    pub to: String,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    InvalidTargetLanguage,
    InvalidSourceLanguage,
    ExternalTool,
    Timeout,
    Preferences,
    Clipboard,
}

/// Payload of the user-visible error notification
#[derive(Debug, Clone)]
pub struct ErrorNotice {
    pub kind: ErrorKind,
    pub message: String,
    pub request: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    // Front-end -> backend
    RefreshLanguages,
    SetUseEnglishNames(bool),
    SetInputLanguage(String),
    SetOutputLanguage(String),
    SwapLanguages,
    Translate(TranslationRequest),
    CancelTranslation(Uuid),
    CopyToClipboard(String),
    /// Answered with `Flushed` once every earlier request has been handled
    Flush,
    Shutdown,

    // Backend -> front-end
    BackendReady,
    LanguagesChanged(Vec<String>),
    UseEnglishNamesChanged(bool),
    InputLanguageChanged(String),
    OutputLanguageChanged(String),
    TranslationFinished { id: Uuid, text: String },
    TranslationCancelled { id: Uuid },
    Copied,
    Flushed,
    Error(ErrorNotice),
}
