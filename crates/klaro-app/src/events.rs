use kanal::{AsyncReceiver, AsyncSender};
use klaro_core::{PreferenceStore, TranslationManager};
use klaro_types::AppEvent;
use tokio_util::sync::CancellationToken;

pub mod clipboard;
pub mod translate;

use clipboard::handle_copy;
use translate::{Translations, handle_translate};

/// App's main loop. Owns the manager; every state change happens here.
pub async fn event_loop<S: PreferenceStore>(
    mut manager: TranslationManager<S>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut translations = Translations::new(cancel.child_token());
    manager.set_cancel_token(cancel.child_token());

    let use_english_names = manager.preferences().use_english_names;
    if let Err(e) = manager.refresh(use_english_names).await {
        tracing::info!("Starting without languages: {e}");
    }
    manager.publish_state();
    app_to_ui_tx.send(AppEvent::BackendReady).await?;

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("[EVENT_LOOP] Cancelled");
                break;
            }
            Some(finished) = translations.join_next() => {
                translations.finish(finished, &app_to_ui_tx).await?;
            }
            event = ui_to_app_rx.recv() => {
                let Ok(event) = event else {
                    tracing::info!("[EVENT_LOOP] Front-end disconnected");
                    break;
                };
                tracing::debug!("[EVENT_LOOP] EVENT RECEIVED: {:?}", std::mem::discriminant(&event));

                if !handle_events(&mut manager, &mut translations, &app_to_ui_tx, event).await? {
                    tracing::info!("[EVENT_LOOP] Shutdown requested");
                    break;
                }
            }
        }
    }

    translations.shutdown().await;
    Ok(())
}

/// Returns `false` when the loop should stop
async fn handle_events<S: PreferenceStore>(
    manager: &mut TranslationManager<S>,
    translations: &mut Translations,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<bool> {
    match event {
        AppEvent::RefreshLanguages => {
            let use_english_names = manager.preferences().use_english_names;
            if let Err(e) = manager.refresh(use_english_names).await {
                tracing::debug!("Refresh failed: {e}");
            }
        }
        AppEvent::SetUseEnglishNames(value) => {
            if let Err(e) = manager.set_use_english_names(value).await {
                tracing::debug!("Refresh after mode switch failed: {e}");
            }
        }
        AppEvent::SetInputLanguage(name) => manager.set_input_language(&name),
        AppEvent::SetOutputLanguage(name) => manager.set_output_language(&name),
        AppEvent::SwapLanguages => manager.swap_languages(),
        AppEvent::Translate(request) => {
            handle_translate(manager, translations, app_to_ui_tx, request).await?;
        }
        AppEvent::CancelTranslation(id) => {
            if !translations.cancel(id) {
                tracing::debug!("No running translation {id} to cancel");
            }
        }
        AppEvent::CopyToClipboard(text) => {
            tokio::spawn(handle_copy(text, app_to_ui_tx.clone()));
        }
        AppEvent::Flush => {
            app_to_ui_tx.send(AppEvent::Flushed).await?;
        }
        AppEvent::Shutdown => return Ok(false),
        AppEvent::BackendReady
        | AppEvent::LanguagesChanged(_)
        | AppEvent::UseEnglishNamesChanged(_)
        | AppEvent::InputLanguageChanged(_)
        | AppEvent::OutputLanguageChanged(_)
        | AppEvent::TranslationFinished { .. }
        | AppEvent::TranslationCancelled { .. }
        | AppEvent::Copied
        | AppEvent::Flushed
        | AppEvent::Error(_) => {
            // Notifications only flow towards the front-end
            tracing::warn!("Ignoring notification sent to the backend: {:?}", event);
        }
    }

    Ok(true)
}
