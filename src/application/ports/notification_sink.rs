use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{app_error::AppResult, domain::entities::notification::NotificationKind};

/// A queued user notification. Use cases enqueue these after their main
/// transaction has committed; the dispatch worker drains the queue and
/// pushes events through the sink with its own failure handling.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    pub user_id: Uuid,
    pub payload: serde_json::Value,
}

/// Delivery boundary. Implementations fan events out to email/push/etc.;
/// a failure here never reaches the code that produced the event.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, event: &NotificationEvent) -> AppResult<()>;
}

/// Cloneable handle held by use cases to enqueue notifications.
///
/// `notify` never blocks and never fails the caller; a closed channel is
/// logged and the event dropped.
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<NotificationEvent>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<NotificationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn notify(&self, kind: NotificationKind, user_id: Uuid, payload: serde_json::Value) {
        let event = NotificationEvent {
            kind,
            user_id,
            payload,
        };
        if let Err(e) = self.tx.send(event) {
            let event = e.0;
            tracing::warn!(
                kind = %event.kind,
                user_id = %event.user_id,
                "Notification channel closed; event dropped"
            );
        }
    }
}
