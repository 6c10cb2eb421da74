use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::payout_gateway::{GatewayPayoutStatus, PayoutGateway, PayoutRequest},
    application::use_cases::wallet_ledger::WalletLedger,
    domain::entities::payout::{ContributorPayout, PayoutStatus},
};

#[derive(Debug, Clone)]
pub struct NewPayout {
    pub user_id: Uuid,
    pub wallet_id: Uuid,
    pub amount_cents: i64,
    pub currency: String,
    pub destination_msisdn: String,
    pub reference: String,
}

#[async_trait]
pub trait PayoutRepo: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<ContributorPayout>>;
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<ContributorPayout>>;
    /// Inserts a PENDING payout.
    async fn create(&self, input: &NewPayout) -> AppResult<ContributorPayout>;
    async fn list_pending(&self, limit: i64) -> AppResult<Vec<ContributorPayout>>;
    /// PENDING -> SENT with the gateway's transaction ref.
    async fn mark_sent(
        &self,
        id: Uuid,
        transaction_ref: &str,
    ) -> AppResult<Option<ContributorPayout>>;
    /// PENDING -> FAILED with the failure reason.
    async fn mark_failed(&self, id: Uuid, reason: &str) -> AppResult<Option<ContributorPayout>>;
    /// FAILED -> PENDING for an explicit retry; clears the failure reason.
    async fn mark_pending(&self, id: Uuid) -> AppResult<Option<ContributorPayout>>;
    /// FAILED -> REVERSED. The guard runs before any wallet credit so a
    /// payout can be reversed at most once.
    async fn mark_reversed(&self, id: Uuid) -> AppResult<Option<ContributorPayout>>;
}

/// Contributor payouts: debit at request time, dispatch through the gateway,
/// explicit retry and reversal.
///
/// A gateway failure never credits the wallet back automatically; the
/// transfer may have landed despite the error, so the money stays reserved
/// until an operator retries or reverses.
pub struct PayoutUseCases {
    payout_repo: Arc<dyn PayoutRepo>,
    gateway: Arc<dyn PayoutGateway>,
    ledger: Arc<WalletLedger>,
}

impl PayoutUseCases {
    pub fn new(
        payout_repo: Arc<dyn PayoutRepo>,
        gateway: Arc<dyn PayoutGateway>,
        ledger: Arc<WalletLedger>,
    ) -> Self {
        Self {
            payout_repo,
            gateway,
            ledger,
        }
    }

    pub async fn get(&self, id: Uuid) -> AppResult<ContributorPayout> {
        self.payout_repo
            .get_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<ContributorPayout>> {
        self.payout_repo.list_by_user(user_id).await
    }

    /// Reserves the amount (wallet debit) and records a PENDING payout with
    /// a fresh gateway reference. Dispatch happens separately so a gateway
    /// outage cannot leave money debited without a payout row.
    pub async fn request_payout(
        &self,
        user_id: Uuid,
        amount_cents: i64,
        destination_msisdn: &str,
    ) -> AppResult<ContributorPayout> {
        if destination_msisdn.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "destination msisdn must not be empty".to_string(),
            ));
        }
        let wallet = self.ledger.get_by_user(user_id).await?;
        let wallet = self.ledger.debit(wallet.id, amount_cents).await?;

        let input = NewPayout {
            user_id,
            wallet_id: wallet.id,
            amount_cents,
            currency: wallet.currency.clone(),
            destination_msisdn: destination_msisdn.trim().to_string(),
            reference: Uuid::new_v4().to_string(),
        };
        match self.payout_repo.create(&input).await {
            Ok(payout) => Ok(payout),
            Err(e) => {
                // The debit already committed; put the money back.
                if let Err(credit_err) = self.ledger.credit(wallet.id, amount_cents).await {
                    tracing::error!(
                        wallet_id = %wallet.id,
                        error = %credit_err,
                        "Failed to refund after payout insert failure; manual reconciliation required"
                    );
                }
                Err(e)
            }
        }
    }

    /// Pushes one PENDING payout through the gateway and records the
    /// terminal result.
    pub async fn send_one(&self, payout: &ContributorPayout) -> AppResult<ContributorPayout> {
        if payout.status != PayoutStatus::Pending {
            return Err(AppError::InvalidStateTransition {
                from: payout.status.as_str().to_string(),
                attempted: PayoutStatus::Sent.as_str().to_string(),
            });
        }
        let request = PayoutRequest {
            amount_cents: payout.amount_cents,
            currency: payout.currency.clone(),
            destination_msisdn: payout.destination_msisdn.clone(),
            reference: payout.reference.clone(),
        };
        match self.gateway.payout(&request).await {
            Ok(receipt) if receipt.status != GatewayPayoutStatus::Rejected => self
                .payout_repo
                .mark_sent(payout.id, &receipt.transaction_ref)
                .await?
                .ok_or(AppError::NotFound),
            Ok(receipt) => {
                tracing::warn!(
                    payout_id = %payout.id,
                    transaction_ref = %receipt.transaction_ref,
                    "Payout rejected by gateway"
                );
                self.payout_repo
                    .mark_failed(payout.id, "rejected by gateway")
                    .await?
                    .ok_or(AppError::NotFound)
            }
            Err(e) => {
                tracing::warn!(payout_id = %payout.id, error = %e, "Payout dispatch failed");
                self.payout_repo
                    .mark_failed(payout.id, &e.to_string())
                    .await?
                    .ok_or(AppError::NotFound)
            }
        }
    }

    /// Dispatches every PENDING payout, isolating failures per payout.
    /// Returns (sent, failed).
    pub async fn send_due_payouts(&self, limit: i64) -> AppResult<(u64, u64)> {
        let pending = self.payout_repo.list_pending(limit).await?;
        let mut sent = 0u64;
        let mut failed = 0u64;
        for payout in pending {
            match self.send_one(&payout).await {
                Ok(updated) if updated.status == PayoutStatus::Sent => sent += 1,
                Ok(_) => failed += 1,
                Err(e) => {
                    failed += 1;
                    tracing::error!(payout_id = %payout.id, error = %e, "Payout dispatch errored");
                }
            }
        }
        Ok((sent, failed))
    }

    /// FAILED -> PENDING, then an immediate dispatch attempt with the same
    /// gateway reference.
    pub async fn retry_payout(&self, id: Uuid) -> AppResult<ContributorPayout> {
        let payout = self.get(id).await?;
        let pending = match self.payout_repo.mark_pending(payout.id).await? {
            Some(pending) => pending,
            None => {
                return Err(AppError::InvalidStateTransition {
                    from: payout.status.as_str().to_string(),
                    attempted: PayoutStatus::Pending.as_str().to_string(),
                });
            }
        };
        self.send_one(&pending).await
    }

    /// FAILED -> REVERSED plus a compensating wallet credit. The status
    /// guard commits first, so the credit can be granted at most once even
    /// under concurrent reversal requests.
    pub async fn reverse_payout(&self, id: Uuid) -> AppResult<ContributorPayout> {
        let payout = self.get(id).await?;
        let reversed = match self.payout_repo.mark_reversed(payout.id).await? {
            Some(reversed) => reversed,
            None => {
                return Err(AppError::InvalidStateTransition {
                    from: payout.status.as_str().to_string(),
                    attempted: PayoutStatus::Reversed.as_str().to_string(),
                });
            }
        };
        self.ledger
            .credit(reversed.wallet_id, reversed.amount_cents)
            .await?;
        tracing::info!(
            payout_id = %reversed.id,
            amount_cents = reversed.amount_cents,
            "Payout reversed and wallet credited"
        );
        Ok(reversed)
    }
}
