use std::collections::HashMap;

use kanal::AsyncSender;
use klaro_core::{PreferenceStore, TranslationError, TranslationJob, TranslationManager};
use klaro_types::{AppEvent, ErrorKind, ErrorNotice, TranslationRequest};
use tokio::task::{self, JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

type Outcome = Result<String, TranslationError>;

pub async fn handle_translate<S: PreferenceStore>(
    manager: &TranslationManager<S>,
    translations: &mut Translations,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    request: TranslationRequest,
) -> anyhow::Result<()> {
    match manager.prepare(&request) {
        Ok(Some(job)) => translations.start(job),
        Ok(None) => {
            tracing::debug!("Empty text, nothing to translate");
            app_to_ui_tx
                .send(AppEvent::TranslationFinished {
                    id: request.id,
                    text: String::new(),
                })
                .await?;
        }
        // Already published by the manager
        Err(e) => tracing::debug!("Rejected translation {}: {e}", request.id),
    }

    Ok(())
}

/// In-flight translations, each cancellable by request id
pub struct Translations {
    tasks: JoinSet<Outcome>,
    tokens: HashMap<Uuid, CancellationToken>,
    requests: HashMap<task::Id, Uuid>,
    cancel: CancellationToken,
}

impl Translations {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            tasks: JoinSet::new(),
            tokens: HashMap::new(),
            requests: HashMap::new(),
            cancel,
        }
    }

    pub fn start(&mut self, job: TranslationJob) {
        let id = job.id();
        let token = self.cancel.child_token();
        self.tokens.insert(id, token.clone());

        tracing::info!("Starting translation {id} ({})", job.pair().to_arg());
        let handle = self.tasks.spawn(job.run(token));
        self.requests.insert(handle.id(), id);
    }

    pub fn cancel(&mut self, id: Uuid) -> bool {
        match self.tokens.get(&id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub async fn join_next(&mut self) -> Option<Result<(task::Id, Outcome), JoinError>> {
        self.tasks.join_next_with_id().await
    }

    pub async fn finish(
        &mut self,
        finished: Result<(task::Id, Outcome), JoinError>,
        app_to_ui_tx: &AsyncSender<AppEvent>,
    ) -> anyhow::Result<()> {
        let (task_id, result) = match finished {
            Ok(finished) => finished,
            Err(e) => {
                let Some(id) = self.forget(e.id()) else {
                    tracing::error!("Unknown translation task failed: {e}");
                    return Ok(());
                };
                tracing::error!("Translation {id} panicked: {e}");
                app_to_ui_tx
                    .send(AppEvent::Error(ErrorNotice {
                        kind: ErrorKind::ExternalTool,
                        message: "Translation failed unexpectedly".to_string(),
                        request: Some(id),
                    }))
                    .await?;
                return Ok(());
            }
        };
        let Some(id) = self.forget(task_id) else {
            tracing::warn!("Finished task {task_id} has no request");
            return Ok(());
        };

        match result {
            Ok(text) => {
                tracing::debug!("Translation {id} finished: {} chars", text.chars().count());
                app_to_ui_tx
                    .send(AppEvent::TranslationFinished { id, text })
                    .await?;
            }
            Err(TranslationError::Cancelled) => {
                app_to_ui_tx
                    .send(AppEvent::TranslationCancelled { id })
                    .await?;
            }
            // Published by the job itself
            Err(e) => tracing::debug!("Translation {id} failed: {e}"),
        }

        Ok(())
    }

    fn forget(&mut self, task_id: task::Id) -> Option<Uuid> {
        let id = self.requests.remove(&task_id)?;
        self.tokens.remove(&id);
        Some(id)
    }

    /// Cancel whatever is still running and wait for the processes to go away
    pub async fn shutdown(&mut self) {
        if !self.is_empty() {
            tracing::info!("Cancelling {} running translations", self.len());
        }
        self.cancel.cancel();
        while self.tasks.join_next().await.is_some() {}
        self.tokens.clear();
        self.requests.clear();
    }
}
