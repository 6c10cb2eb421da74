use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::wallet::Wallet,
};

#[async_trait]
pub trait WalletRepo: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Wallet>>;
    async fn get_by_user(&self, user_id: Uuid) -> AppResult<Option<Wallet>>;
    /// Conditionally decrements the balance. Returns `None` when the wallet
    /// does not cover `amount_cents`. Must be atomic under concurrent debits
    /// against the same wallet.
    async fn try_debit(&self, id: Uuid, amount_cents: i64) -> AppResult<Option<Wallet>>;
    /// Unconditional increment. Returns `None` when the wallet is missing.
    async fn credit(&self, id: Uuid, amount_cents: i64) -> AppResult<Option<Wallet>>;
}

/// Wallet balance operations. The conditional debit in the repository is
/// the authoritative race-safe gate; `check_balance` is advisory only.
pub struct WalletLedger {
    wallet_repo: Arc<dyn WalletRepo>,
}

impl WalletLedger {
    pub fn new(wallet_repo: Arc<dyn WalletRepo>) -> Self {
        Self { wallet_repo }
    }

    pub async fn debit(&self, wallet_id: Uuid, amount_cents: i64) -> AppResult<Wallet> {
        require_positive(amount_cents)?;
        match self.wallet_repo.try_debit(wallet_id, amount_cents).await? {
            Some(wallet) => Ok(wallet),
            None => {
                let wallet = self
                    .wallet_repo
                    .get_by_id(wallet_id)
                    .await?
                    .ok_or(AppError::NotFound)?;
                Err(AppError::InsufficientFunds {
                    required_cents: amount_cents,
                    available_cents: wallet.balance_cents,
                })
            }
        }
    }

    pub async fn credit(&self, wallet_id: Uuid, amount_cents: i64) -> AppResult<Wallet> {
        require_positive(amount_cents)?;
        self.wallet_repo
            .credit(wallet_id, amount_cents)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Non-mutating pre-check used to produce a user-facing error before a
    /// multi-step operation starts. Callers must still treat `debit` as the
    /// gate.
    pub async fn check_balance(&self, wallet_id: Uuid, amount_cents: i64) -> AppResult<bool> {
        let wallet = self
            .wallet_repo
            .get_by_id(wallet_id)
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(wallet.covers(amount_cents))
    }

    pub async fn get_by_user(&self, user_id: Uuid) -> AppResult<Wallet> {
        self.wallet_repo
            .get_by_user(user_id)
            .await?
            .ok_or(AppError::NotFound)
    }
}

fn require_positive(amount_cents: i64) -> AppResult<()> {
    if amount_cents <= 0 {
        return Err(AppError::InvalidInput(
            "amount must be a positive number of minor units".to_string(),
        ));
    }
    Ok(())
}
