use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Contributor payout status.
///
/// `Failed` is retryable (same gateway reference) or reversible (explicit
/// wallet credit); `Sent` and `Reversed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payout_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    Pending,
    Sent,
    Failed,
    Reversed,
}

impl PayoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutStatus::Pending => "pending",
            PayoutStatus::Sent => "sent",
            PayoutStatus::Failed => "failed",
            PayoutStatus::Reversed => "reversed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PayoutStatus::Sent | PayoutStatus::Reversed)
    }
}

impl std::fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Revenue-share transfer to a contributor's mobile-money number. The
/// wallet debit happens at request time; `reference` stays stable across
/// gateway retries so the transfer is idempotent on their side.
#[derive(Debug, Clone, Serialize)]
pub struct ContributorPayout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub wallet_id: Uuid,
    pub amount_cents: i64,
    pub currency: String,
    pub destination_msisdn: String,
    pub reference: String,
    pub status: PayoutStatus,
    pub transaction_ref: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
