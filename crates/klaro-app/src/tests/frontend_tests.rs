use std::sync::Arc;
use std::time::Duration;

use klaro_config::Config;
use klaro_core::{MemoryPreferenceStore, Preferences};
use klaro_types::{AUTO_DETECT, AppEvent};
use tokio::task::JoinSet;
use tokio::time::timeout;

use super::SlowTranslator;
use crate::controller::AppController;
use crate::frontend::Frontend;

struct Running {
    controller: AppController,
    // Dropping the set would abort the backend
    _tasks: JoinSet<anyhow::Result<()>>,
}

async fn ready_frontend(prefs: Preferences) -> (Running, Frontend) {
    let controller = AppController::new(&Config::new());
    let tasks = controller.spawn_tasks(
        Arc::new(SlowTranslator::new(Duration::ZERO)),
        MemoryPreferenceStore::with(prefs),
    );
    let mut frontend = controller.frontend();
    timeout(Duration::from_secs(2), frontend.wait_ready())
        .await
        .expect("backend never became ready")
        .unwrap();
    (
        Running {
            controller,
            _tasks: tasks,
        },
        frontend,
    )
}

#[tokio::test]
async fn test_frontend_mirrors_backend_state() {
    let (running, frontend) = ready_frontend(Preferences::default()).await;

    let state = frontend.state();
    assert_eq!(state.input_language, AUTO_DETECT);
    assert_eq!(state.output_language, "English");
    assert!(!state.use_english_names);
    assert_eq!(
        state.languages,
        vec![AUTO_DETECT, "English", "Deutsch", "français"]
    );
    running.controller.shutdown();
}

#[tokio::test]
async fn test_frontend_translate_round_trip() {
    let (running, mut frontend) = ready_frontend(Preferences::default()).await;

    let result = timeout(
        Duration::from_secs(2),
        frontend.translate("Bonjour", "français", "English"),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(result.as_deref(), Some("[fr:en] Bonjour"));
    assert_eq!(
        frontend.state().last_translation.as_deref(),
        Some("[fr:en] Bonjour")
    );
    running.controller.shutdown();
}

#[tokio::test]
async fn test_frontend_translate_error() {
    let (running, mut frontend) = ready_frontend(Preferences::default()).await;

    let err = timeout(
        Duration::from_secs(2),
        frontend.translate("Hello", AUTO_DETECT, "Elvish"),
    )
    .await
    .unwrap()
    .unwrap_err();

    assert!(err.to_string().contains("Elvish"));
    running.controller.shutdown();
}

#[tokio::test]
async fn test_frontend_flush_sees_mode_switch() {
    let (running, mut frontend) = ready_frontend(Preferences::default()).await;

    frontend
        .send(AppEvent::SetUseEnglishNames(true))
        .await
        .unwrap();
    timeout(Duration::from_secs(2), frontend.flush())
        .await
        .unwrap()
        .unwrap();

    let state = frontend.state();
    assert!(state.use_english_names);
    assert_eq!(
        state.languages,
        vec![AUTO_DETECT, "English", "German", "French"]
    );
    running.controller.shutdown();
}
