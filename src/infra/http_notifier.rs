use std::time::Duration;

use async_trait::async_trait;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::notification_sink::{NotificationEvent, NotificationSink},
};

/// Posts notification events to an external delivery service which fans
/// them out to the user's channels.
pub struct HttpNotificationSink {
    client: reqwest::Client,
    url: String,
}

impl HttpNotificationSink {
    pub fn new(url: String, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build reqwest client");
        Self { client, url }
    }
}

#[async_trait]
impl NotificationSink for HttpNotificationSink {
    async fn deliver(&self, event: &NotificationEvent) -> AppResult<()> {
        let response = self
            .client
            .post(&self.url)
            .json(event)
            .send()
            .await
            .map_err(|e| AppError::Gateway(format!("notification post failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Gateway(format!(
                "notification endpoint returned {status}"
            )));
        }
        Ok(())
    }
}

/// Fallback sink when no delivery endpoint is configured.
pub struct LogNotificationSink;

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn deliver(&self, event: &NotificationEvent) -> AppResult<()> {
        tracing::info!(
            kind = %event.kind,
            user_id = %event.user_id,
            payload = %event.payload,
            "Notification"
        );
        Ok(())
    }
}
