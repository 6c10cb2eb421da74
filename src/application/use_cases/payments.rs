use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::wallet_ledger::WalletRepo,
    domain::entities::payment::Payment,
};

/// Everything needed to persist one paid payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: Uuid,
    pub wallet_id: Uuid,
    pub service_id: Option<Uuid>,
    pub plan_id: Option<Uuid>,
    pub package_plan_id: Option<Uuid>,
    pub currency: String,
    pub amount_cents: i64,
}

/// What a payment is for, resolved by the orchestrator before charging.
#[derive(Debug, Clone)]
pub struct PaymentCharge {
    pub service_id: Option<Uuid>,
    pub plan_id: Option<Uuid>,
    pub package_plan_id: Option<Uuid>,
    pub currency: String,
    pub amount_cents: i64,
}

#[async_trait]
pub trait PaymentRepo: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Payment>>;
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Payment>>;
    /// Debits the wallet and inserts the PAID payment as one atomic unit.
    /// When the conditional debit does not apply this fails with
    /// `InsufficientFunds` and persists nothing; when the insert fails the
    /// debit rolls back with it.
    async fn record_paid(&self, input: &NewPayment) -> AppResult<Payment>;
}

/// Creates immutable payment records tied to wallet debits.
pub struct PaymentRecorder {
    payment_repo: Arc<dyn PaymentRepo>,
    wallet_repo: Arc<dyn WalletRepo>,
}

impl PaymentRecorder {
    pub fn new(payment_repo: Arc<dyn PaymentRepo>, wallet_repo: Arc<dyn WalletRepo>) -> Self {
        Self {
            payment_repo,
            wallet_repo,
        }
    }

    pub async fn create_payment(&self, user_id: Uuid, charge: &PaymentCharge) -> AppResult<Payment> {
        if charge.amount_cents <= 0 {
            return Err(AppError::InvalidInput(
                "charge amount must be positive".to_string(),
            ));
        }

        let wallet = self
            .wallet_repo
            .get_by_user(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        // Advisory pre-check: surfaces the funds error before the
        // transactional attempt. The conditional debit inside `record_paid`
        // remains the race-safe gate.
        if !wallet.covers(charge.amount_cents) {
            return Err(AppError::InsufficientFunds {
                required_cents: charge.amount_cents,
                available_cents: wallet.balance_cents,
            });
        }

        let input = NewPayment {
            user_id,
            wallet_id: wallet.id,
            service_id: charge.service_id,
            plan_id: charge.plan_id,
            package_plan_id: charge.package_plan_id,
            currency: charge.currency.clone(),
            amount_cents: charge.amount_cents,
        };
        self.payment_repo.record_paid(&input).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Payment> {
        self.payment_repo
            .get_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Payment>> {
        self.payment_repo.list_by_user(user_id).await
    }
}
