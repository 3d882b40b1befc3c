use kanal::AsyncSender;
use klaro_types::{AppEvent, ErrorKind, ErrorNotice};

pub async fn handle_copy(text: String, app_to_ui_tx: AsyncSender<AppEvent>) {
    let event = match klaro_io::clipboard::copy_text(text).await {
        Ok(()) => AppEvent::Copied,
        Err(e) => {
            tracing::debug!("Clipboard copy failed: {e:#}");
            AppEvent::Error(ErrorNotice {
                kind: ErrorKind::Clipboard,
                message: format!("{e:#}"),
                request: None,
            })
        }
    };

    let _ = app_to_ui_tx.send(event).await;
}
