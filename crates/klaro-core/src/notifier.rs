use kanal::AsyncSender;
use klaro_types::{AppEvent, ErrorKind, ErrorNotice};
use uuid::Uuid;

/// One-way channel from the facade to whoever renders its state
#[derive(Clone)]
pub struct Notifier {
    tx: AsyncSender<AppEvent>,
}

impl Notifier {
    pub fn new(tx: AsyncSender<AppEvent>) -> Self {
        Self { tx }
    }

    /// Never blocks; a full or closed channel drops the event
    pub fn emit(&self, event: AppEvent) {
        match self.tx.try_send(event) {
            Ok(true) => {}
            Ok(false) => tracing::warn!("Notification channel full, dropping event"),
            Err(e) => tracing::debug!("Notification channel closed: {e}"),
        }
    }

    /// User-facing failure. The notification is the only report, the
    /// front-end decides how to show it.
    pub fn error(&self, kind: ErrorKind, message: impl Into<String>, request: Option<Uuid>) {
        let message = message.into();
        tracing::debug!("{:?}: {}", kind, message);
        self.emit(AppEvent::Error(ErrorNotice {
            kind,
            message,
            request,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_a_single_notification() {
        let (tx, rx) = kanal::bounded_async(4);
        let notifier = Notifier::new(tx);
        let id = Uuid::new_v4();

        notifier.error(ErrorKind::Timeout, "Timed out after 30s", Some(id));

        match rx.try_recv() {
            Ok(Some(AppEvent::Error(notice))) => {
                assert_eq!(notice.kind, ErrorKind::Timeout);
                assert_eq!(notice.message, "Timed out after 30s");
                assert_eq!(notice.request, Some(id));
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(rx.try_recv(), Ok(None)));
    }

    #[test]
    fn test_full_channel_drops_instead_of_blocking() {
        let (tx, rx) = kanal::bounded_async(1);
        let notifier = Notifier::new(tx);

        notifier.emit(AppEvent::Copied);
        notifier.emit(AppEvent::Flushed);

        assert!(matches!(rx.try_recv(), Ok(Some(AppEvent::Copied))));
        assert!(matches!(rx.try_recv(), Ok(None)));
    }
}
