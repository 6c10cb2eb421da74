use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A user's stored-value balance, held in the currency's minor unit.
///
/// Balances change only through ledger operations; the conditional debit in
/// the persistence layer is the gate that keeps concurrent debits safe.
#[derive(Debug, Clone, Serialize)]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub currency: String,
    pub balance_cents: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Wallet {
    pub fn covers(&self, amount_cents: i64) -> bool {
        self.balance_cents >= amount_cents
    }
}
