use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use klaro_config::Config;
use klaro_core::{Notifier, PreferenceStore, TranslationManager};
use klaro_translator::Translator;
use klaro_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::frontend::Frontend;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new(config: &Config) -> Self {
        Self {
            app_to_ui: kanal::bounded_async(config.notify_capacity),
            ui_to_app: kanal::bounded_async(config.request_capacity),
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(config: &Config) -> Self {
        Self {
            channels: ChannelSet::new(config),
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks<S>(
        &self,
        translator: Arc<dyn Translator>,
        store: S,
    ) -> JoinSet<anyhow::Result<()>>
    where
        S: PreferenceStore + 'static,
    {
        let mut tasks = JoinSet::new();

        let notifier = Notifier::new(self.channels.app_to_ui.0.clone());
        let manager = TranslationManager::new(translator, store, notifier);

        // Event loop
        tasks.spawn(event_loop(
            manager,
            self.channels.ui_to_app.1.clone(),
            self.channels.app_to_ui.0.clone(),
            self.cancel_token.child_token(),
        ));

        tasks
    }

    pub fn frontend(&self) -> Frontend {
        Frontend::new(
            self.channels.ui_to_app.0.clone(),
            self.channels.app_to_ui.1.clone(),
        )
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
