mod frontend_tests;

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kanal::AsyncReceiver;
use klaro_translator::{ProviderMetadata, TranslateError, Translation, Translator};
use klaro_types::{AppEvent, Language, LanguagePair};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

/// Tool stand-in; `delay` keeps a translation running until cancelled
pub struct SlowTranslator {
    pub delay: Duration,
    pub calls: Mutex<Vec<(String, LanguagePair)>>,
    /// Listing exits non-zero while set
    pub listing_fails: AtomicBool,
    /// Translation panics while set
    pub panics: AtomicBool,
}

impl SlowTranslator {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: Mutex::new(Vec::new()),
            listing_fails: AtomicBool::new(false),
            panics: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Translator for SlowTranslator {
    async fn translate(
        &self,
        text: &str,
        pair: &LanguagePair,
        cancel: CancellationToken,
    ) -> Result<Translation, TranslateError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), pair.clone()));

        if self.panics.load(Ordering::SeqCst) {
            panic!("translator crashed");
        }

        tokio::select! {
            _ = tokio::time::sleep(self.delay) => {}
            _ = cancel.cancelled() => return Err(TranslateError::Cancelled),
        }

        Ok(Translation {
            text: format!("[{}] {}", pair.to_arg(), text),
            pair: pair.clone(),
            provider: "slow".to_string(),
        })
    }

    async fn list_languages(
        &self,
        _cancel: CancellationToken,
    ) -> Result<Vec<Language>, TranslateError> {
        if self.listing_fails.load(Ordering::SeqCst) {
            return Err(TranslateError::ExternalTool {
                code: Some(1),
                stderr: "[ERROR] Network unreachable".to_string(),
            });
        }

        Ok(vec![
            Language::new("en", "English", "English"),
            Language::new("de", "German", "Deutsch"),
            Language::new("fr", "French", "français"),
        ])
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "slow".to_string(),
            program: "slow".to_string(),
        }
    }
}

/// Listing that only returns once cancelled
pub struct HungListing;

#[async_trait]
impl Translator for HungListing {
    async fn translate(
        &self,
        _text: &str,
        _pair: &LanguagePair,
        _cancel: CancellationToken,
    ) -> Result<Translation, TranslateError> {
        Err(TranslateError::Cancelled)
    }

    async fn list_languages(
        &self,
        cancel: CancellationToken,
    ) -> Result<Vec<Language>, TranslateError> {
        cancel.cancelled().await;
        Err(TranslateError::Cancelled)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "hung".to_string(),
            program: "hung".to_string(),
        }
    }
}

/// Next event matching `pred`, skipping the rest
pub async fn next_matching<F>(rx: &AsyncReceiver<AppEvent>, pred: F) -> AppEvent
where
    F: Fn(&AppEvent) -> bool,
{
    let result = timeout(Duration::from_secs(2), async {
        loop {
            let event = rx.recv().await.expect("channel closed");
            if pred(&event) {
                return event;
            }
        }
    })
    .await;

    match result {
        Ok(event) => event,
        Err(_) => panic!("Timeout - expected event never arrived!"),
    }
}
