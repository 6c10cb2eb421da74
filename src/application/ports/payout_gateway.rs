use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::app_error::AppResult;

/// Transfer order handed to the mobile-money gateway. `reference` is the
/// idempotency key: retries of the same payout must reuse it so the gateway
/// can dedupe.
#[derive(Debug, Clone, Serialize)]
pub struct PayoutRequest {
    pub amount_cents: i64,
    pub currency: String,
    pub destination_msisdn: String,
    pub reference: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayPayoutStatus {
    Accepted,
    Settled,
    Rejected,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayoutReceipt {
    pub transaction_ref: String,
    pub status: GatewayPayoutStatus,
}

/// Opaque third-party payout rail. Transport failures surface as
/// `AppError::Gateway` with a reason string; they never roll back state that
/// was committed before the call.
#[async_trait]
pub trait PayoutGateway: Send + Sync {
    async fn payout(&self, request: &PayoutRequest) -> AppResult<PayoutReceipt>;
}
