use std::sync::Arc;

use klaro_translator::{TranslateError, Translator};
use klaro_types::{AppEvent, ErrorKind, LanguagePair, TranslationRequest};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::catalog::{Catalog, is_auto_detect};
use crate::error::{FetchError, TranslationError};
use crate::notifier::Notifier;
use crate::preferences::{JsonPreferenceStore, PreferenceStore, Preferences};

/// Owns the catalog and the preferences and publishes every change through
/// the [`Notifier`]. Meant to be driven from a single task.
pub struct TranslationManager<S = JsonPreferenceStore> {
    translator: Arc<dyn Translator>,
    store: S,
    catalog: Catalog,
    preferences: Preferences,
    notifier: Notifier,
    cancel: CancellationToken,
}

impl<S: PreferenceStore> TranslationManager<S> {
    /// Loads preferences; the catalog stays empty until [`Self::refresh`]
    pub fn new(translator: Arc<dyn Translator>, store: S, notifier: Notifier) -> Self {
        let preferences = store.load();
        tracing::info!(
            "Loaded preferences: {} -> {} (english names: {})",
            preferences.input_language,
            preferences.output_language,
            preferences.use_english_names
        );

        Self {
            translator,
            store,
            catalog: Catalog::new(Vec::new(), preferences.use_english_names),
            preferences,
            notifier,
            cancel: CancellationToken::new(),
        }
    }

    /// Listing calls are cancelled together with `token`
    pub fn set_cancel_token(&mut self, token: CancellationToken) {
        self.cancel = token;
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn available_languages(&self) -> Vec<String> {
        self.catalog.display_names()
    }

    pub fn resolve(&self, display_name: &str) -> Option<&str> {
        self.catalog.resolve(display_name)
    }

    /// Announce the whole current state, e.g. for a front-end that just attached
    pub fn publish_state(&self) {
        self.notifier.emit(AppEvent::UseEnglishNamesChanged(
            self.preferences.use_english_names,
        ));
        self.notifier.emit(AppEvent::InputLanguageChanged(
            self.preferences.input_language.clone(),
        ));
        self.notifier.emit(AppEvent::OutputLanguageChanged(
            self.preferences.output_language.clone(),
        ));
        self.notifier
            .emit(AppEvent::LanguagesChanged(self.available_languages()));
    }

    /// Re-read the listing in the given display mode. A mode other than the
    /// stored one is applied first, exactly like [`Self::set_use_english_names`].
    /// On failure the previous entries are kept.
    pub async fn refresh(&mut self, use_english_names: bool) -> Result<(), FetchError> {
        if self.preferences.use_english_names != use_english_names {
            self.switch_mode(use_english_names);
        }
        self.fetch().await
    }

    async fn fetch(&mut self) -> Result<(), FetchError> {
        let languages = match self.translator.list_languages(self.cancel.child_token()).await {
            Ok(languages) if languages.is_empty() => Err(FetchError::Empty),
            Ok(languages) => Ok(languages),
            Err(e) => Err(FetchError::from(e)),
        };

        let languages = match languages {
            Ok(languages) => languages,
            Err(FetchError::Tool(TranslateError::Cancelled)) => {
                tracing::debug!("Language listing cancelled");
                return Err(FetchError::Tool(TranslateError::Cancelled));
            }
            Err(e) => {
                tracing::info!("Keeping {} cached languages", self.catalog.len());
                self.notifier.error(ErrorKind::Fetch, e.to_string(), None);
                return Err(e);
            }
        };

        self.catalog.replace(languages);
        tracing::info!("Catalog refreshed: {} languages", self.catalog.len());

        let duplicates = self.catalog.duplicate_display_names();
        if !duplicates.is_empty() {
            tracing::warn!(
                "Display names shared by several languages, first entry wins: {}",
                duplicates.join(", ")
            );
        }

        self.notifier
            .emit(AppEvent::LanguagesChanged(self.available_languages()));
        Ok(())
    }

    /// Resolve display names into the pair handed to the tool
    pub fn plan(&self, from: &str, to: &str) -> Result<LanguagePair, TranslationError> {
        let to_code = self
            .catalog
            .resolve(to)
            .ok_or_else(|| TranslationError::InvalidTargetLanguage(to.to_string()))?;

        let from_code = if is_auto_detect(from) {
            None
        } else {
            let code = self
                .catalog
                .resolve(from)
                .ok_or_else(|| TranslationError::InvalidSourceLanguage(from.to_string()))?;
            Some(code.to_string())
        };

        Ok(LanguagePair::new(from_code, to_code.to_string()))
    }

    /// Validate a request into a job that no longer borrows the manager.
    /// `Ok(None)` means there is nothing to translate.
    pub fn prepare(
        &self,
        request: &TranslationRequest,
    ) -> Result<Option<TranslationJob>, TranslationError> {
        if request.text.trim().is_empty() {
            return Ok(None);
        }

        let pair = self
            .plan(&request.from, &request.to)
            .inspect_err(|e| report(&self.notifier, request.id, e))?;

        Ok(Some(TranslationJob {
            id: request.id,
            text: request.text.clone(),
            pair,
            translator: Arc::clone(&self.translator),
            notifier: self.notifier.clone(),
        }))
    }

    pub async fn translate(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<String, TranslationError> {
        let request = TranslationRequest::new(text, from, to);
        self.translate_request(&request, CancellationToken::new())
            .await
    }

    pub async fn translate_request(
        &self,
        request: &TranslationRequest,
        cancel: CancellationToken,
    ) -> Result<String, TranslationError> {
        match self.prepare(request)? {
            Some(job) => job.run(cancel).await,
            None => Ok(String::new()),
        }
    }

    pub fn set_input_language(&mut self, name: &str) {
        if self.preferences.input_language == name {
            return;
        }
        self.preferences.input_language = name.to_string();
        self.persist();
        self.notifier
            .emit(AppEvent::InputLanguageChanged(name.to_string()));
    }

    pub fn set_output_language(&mut self, name: &str) {
        if self.preferences.output_language == name {
            return;
        }
        self.preferences.output_language = name.to_string();
        self.persist();
        self.notifier
            .emit(AppEvent::OutputLanguageChanged(name.to_string()));
    }

    /// Exchange source and target. Not possible while the source is auto detected.
    pub fn swap_languages(&mut self) {
        if is_auto_detect(&self.preferences.input_language) {
            tracing::debug!("Swap ignored, source language is auto detected");
            return;
        }

        let prefs = &mut self.preferences;
        std::mem::swap(&mut prefs.input_language, &mut prefs.output_language);
        self.persist();
        self.notifier.emit(AppEvent::InputLanguageChanged(
            self.preferences.input_language.clone(),
        ));
        self.notifier.emit(AppEvent::OutputLanguageChanged(
            self.preferences.output_language.clone(),
        ));
    }

    /// Switch between English and native names, carrying the current
    /// selections over to the new names, then refetch the listing.
    pub async fn set_use_english_names(&mut self, value: bool) -> Result<(), FetchError> {
        if self.preferences.use_english_names == value {
            return Ok(());
        }
        self.refresh(value).await
    }

    /// Catalog, preferences and store move to the new mode together
    fn switch_mode(&mut self, value: bool) {
        let input = self.resolve(&self.preferences.input_language).map(str::to_string);
        let output = self.resolve(&self.preferences.output_language).map(str::to_string);

        self.catalog.set_use_english_names(value);
        self.preferences.use_english_names = value;
        if let Some(name) = input.and_then(|code| self.display_name_for(&code)) {
            self.preferences.input_language = name;
        }
        if let Some(name) = output.and_then(|code| self.display_name_for(&code)) {
            self.preferences.output_language = name;
        }
        self.persist();

        self.notifier.emit(AppEvent::UseEnglishNamesChanged(value));
        self.notifier.emit(AppEvent::InputLanguageChanged(
            self.preferences.input_language.clone(),
        ));
        self.notifier.emit(AppEvent::OutputLanguageChanged(
            self.preferences.output_language.clone(),
        ));
        self.notifier
            .emit(AppEvent::LanguagesChanged(self.available_languages()));
    }

    fn display_name_for(&self, code: &str) -> Option<String> {
        self.catalog
            .languages()
            .iter()
            .find(|l| l.code == code)
            .map(|l| l.display_name(self.catalog.use_english_names()).to_string())
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.preferences) {
            self.notifier.error(
                ErrorKind::Preferences,
                format!("Could not save preferences: {e}"),
                None,
            );
        }
    }
}

/// A validated translation, ready to run on any task
pub struct TranslationJob {
    id: Uuid,
    text: String,
    pair: LanguagePair,
    translator: Arc<dyn Translator>,
    notifier: Notifier,
}

impl TranslationJob {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn pair(&self) -> &LanguagePair {
        &self.pair
    }

    /// Invoke the tool once. Failures other than cancellation are also
    /// published as error notifications.
    pub async fn run(self, cancel: CancellationToken) -> Result<String, TranslationError> {
        tracing::debug!("Running translation {} ({})", self.id, self.pair.to_arg());

        match self.translator.translate(&self.text, &self.pair, cancel).await {
            Ok(translation) => Ok(translation.text),
            Err(e) => {
                let err = TranslationError::from(e);
                report(&self.notifier, self.id, &err);
                Err(err)
            }
        }
    }
}

fn report(notifier: &Notifier, id: Uuid, err: &TranslationError) {
    match err.kind() {
        Some(kind) => notifier.error(kind, err.to_string(), Some(id)),
        None => tracing::debug!("Translation {id}: {err}"),
    }
}

impl<S> std::fmt::Debug for TranslationManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationManager")
            .field("provider", &self.translator.metadata().name)
            .field("languages", &self.catalog.len())
            .field("preferences", &self.preferences)
            .finish()
    }
}
