use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use kanal::AsyncReceiver;
use klaro_translator::{ProviderMetadata, TranslateError, Translation, Translator};
use klaro_types::{AppEvent, Language, LanguagePair};
use tokio_util::sync::CancellationToken;

/// In-process stand-in for the external tool
pub(crate) struct FakeTranslator {
    /// `None` makes the listing fail like a non-zero exit
    pub listing: Mutex<Option<Vec<Language>>>,
    /// `Err(stderr)` makes translation fail
    pub reply: Mutex<Result<String, String>>,
    /// `Some` makes translation time out after the given duration
    pub timeout: Mutex<Option<Duration>>,
    pub calls: Mutex<Vec<(String, LanguagePair)>>,
    pub list_calls: Mutex<usize>,
}

impl FakeTranslator {
    pub fn new(languages: Vec<Language>) -> Self {
        Self {
            listing: Mutex::new(Some(languages)),
            reply: Mutex::new(Ok("translated\n".to_string())),
            timeout: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            list_calls: Mutex::new(0),
        }
    }

    pub fn en_fr() -> Self {
        Self::new(vec![
            Language::new("en", "English", "English"),
            Language::new("fr", "French", "français"),
        ])
    }

    pub fn calls(&self) -> Vec<(String, LanguagePair)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(
        &self,
        text: &str,
        pair: &LanguagePair,
        _cancel: CancellationToken,
    ) -> Result<Translation, TranslateError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), pair.clone()));

        if let Some(after) = *self.timeout.lock().unwrap() {
            return Err(TranslateError::Timeout(after));
        }

        match self.reply.lock().unwrap().clone() {
            Ok(text) => Ok(Translation {
                text: text.trim().to_string(),
                pair: pair.clone(),
                provider: "fake".to_string(),
            }),
            Err(stderr) => Err(TranslateError::ExternalTool {
                code: Some(1),
                stderr,
            }),
        }
    }

    async fn list_languages(
        &self,
        _cancel: CancellationToken,
    ) -> Result<Vec<Language>, TranslateError> {
        *self.list_calls.lock().unwrap() += 1;
        self.listing
            .lock()
            .unwrap()
            .clone()
            .ok_or(TranslateError::ExternalTool {
                code: Some(2),
                stderr: "listing failed".to_string(),
            })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "fake".to_string(),
            program: "fake".to_string(),
        }
    }
}

pub(crate) fn drain(rx: &AsyncReceiver<AppEvent>) -> Vec<AppEvent> {
    let mut events = Vec::new();
    while let Ok(Some(event)) = rx.try_recv() {
        events.push(event);
    }
    events
}
