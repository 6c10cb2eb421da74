use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::{
    app_error::{AppError, AppResult},
    application::ports::payout_gateway::{PayoutGateway, PayoutReceipt, PayoutRequest},
};

/// Mobile-money gateway client. The payout reference travels as an
/// Idempotency-Key so a retried request cannot produce a second transfer.
pub struct HttpPayoutGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl HttpPayoutGateway {
    pub fn new(base_url: String, api_key: SecretString, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("failed to build reqwest client");
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl PayoutGateway for HttpPayoutGateway {
    async fn payout(&self, request: &PayoutRequest) -> AppResult<PayoutReceipt> {
        let url = format!("{}/transfers", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .header("Idempotency-Key", &request.reference)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::Gateway(format!("transfer request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Gateway(format!(
                "gateway returned {status}: {body}"
            )));
        }
        response
            .json::<PayoutReceipt>()
            .await
            .map_err(|e| AppError::Gateway(format!("invalid gateway response: {e}")))
    }
}
