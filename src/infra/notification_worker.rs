use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use crate::application::ports::notification_sink::{NotificationEvent, NotificationSink};

const DELIVERY_TIMEOUT_SECS: u64 = 15;

/// Drains queued notification events and pushes them through the sink.
/// Delivery is best effort; a failed or timed-out event is logged and
/// dropped, never retried against the producer.
pub async fn run_notification_dispatch_loop(
    mut rx: UnboundedReceiver<NotificationEvent>,
    sink: Arc<dyn NotificationSink>,
) {
    info!("Notification dispatch worker started");

    while let Some(event) = rx.recv().await {
        let delivery = sink.deliver(&event);
        match tokio::time::timeout(Duration::from_secs(DELIVERY_TIMEOUT_SECS), delivery).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(
                    kind = %event.kind,
                    user_id = %event.user_id,
                    error = %e,
                    "Notification delivery failed"
                );
            }
            Err(_) => {
                warn!(
                    kind = %event.kind,
                    user_id = %event.user_id,
                    "Notification delivery timed out"
                );
            }
        }
    }

    info!("Notification channel closed; dispatch worker exiting");
}
