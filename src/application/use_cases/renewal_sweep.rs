use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::{
    app_error::AppResult,
    application::ports::notification_sink::Notifier,
    application::use_cases::{
        payouts::PayoutUseCases,
        subscriptions::{RenewalOutcome, SubscriptionRepo, SubscriptionUseCases},
    },
    domain::entities::notification::NotificationKind,
};

/// What one sweep pass did, for the worker's log line.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SweepSummary {
    pub due: usize,
    pub renewed: u64,
    pub expired: u64,
    pub renewal_failed: u64,
    pub errors: u64,
    pub expiring_soon_notified: u64,
    pub payouts_sent: u64,
    pub payouts_failed: u64,
}

/// The periodic pass over due subscriptions and pending payouts. Every
/// entity is processed independently; one failure is counted and logged,
/// never allowed to stop the pass.
pub struct RenewalSweep {
    subscription_repo: Arc<dyn SubscriptionRepo>,
    subscriptions: Arc<SubscriptionUseCases>,
    payouts: Arc<PayoutUseCases>,
    notifier: Notifier,
    expiry_warn_days: i64,
    batch_size: i64,
}

impl RenewalSweep {
    pub fn new(
        subscription_repo: Arc<dyn SubscriptionRepo>,
        subscriptions: Arc<SubscriptionUseCases>,
        payouts: Arc<PayoutUseCases>,
        notifier: Notifier,
        expiry_warn_days: i64,
        batch_size: i64,
    ) -> Self {
        Self {
            subscription_repo,
            subscriptions,
            payouts,
            notifier,
            expiry_warn_days,
            batch_size,
        }
    }

    pub async fn run_sweep(&self) -> AppResult<SweepSummary> {
        let now = Utc::now();
        let mut summary = SweepSummary::default();

        let due = self.subscription_repo.list_due(now, self.batch_size).await?;
        summary.due = due.len();
        for subscription in due {
            if !subscription.auto_renew {
                // Ran out its paid period with renewal switched off.
                match self.subscriptions.expire(subscription.id).await {
                    Ok(_) => summary.expired += 1,
                    Err(e) => {
                        summary.errors += 1;
                        tracing::error!(
                            subscription_id = %subscription.id,
                            error = %e,
                            "Sweep expiry failed"
                        );
                    }
                }
                continue;
            }
            match self.subscriptions.renew(subscription.id).await {
                Ok(RenewalOutcome::Renewed(_)) => summary.renewed += 1,
                Ok(RenewalOutcome::AttemptFailed { .. }) => summary.renewal_failed += 1,
                Ok(RenewalOutcome::Expired(_)) => summary.expired += 1,
                Err(e) => {
                    summary.errors += 1;
                    tracing::error!(
                        subscription_id = %subscription.id,
                        error = %e,
                        "Sweep renewal failed"
                    );
                }
            }
        }

        // Heads-up for subscriptions that will lapse instead of renewing.
        let until = now + chrono::Duration::days(self.expiry_warn_days);
        match self.subscription_repo.list_expiring_within(now, until).await {
            Ok(expiring) => {
                for subscription in expiring {
                    if subscription.auto_renew {
                        continue;
                    }
                    self.notifier.notify(
                        NotificationKind::ExpiringSoon,
                        subscription.user_id,
                        json!({
                            "subscription_id": subscription.id,
                            "end_date": subscription.end_date,
                        }),
                    );
                    summary.expiring_soon_notified += 1;
                }
            }
            Err(e) => {
                summary.errors += 1;
                tracing::error!(error = %e, "Sweep expiry-warning query failed");
            }
        }

        match self.payouts.send_due_payouts(self.batch_size).await {
            Ok((sent, failed)) => {
                summary.payouts_sent = sent;
                summary.payouts_failed = failed;
            }
            Err(e) => {
                summary.errors += 1;
                tracing::error!(error = %e, "Sweep payout dispatch failed");
            }
        }

        tracing::info!(
            due = summary.due,
            renewed = summary.renewed,
            expired = summary.expired,
            renewal_failed = summary.renewal_failed,
            errors = summary.errors,
            expiring_soon = summary.expiring_soon_notified,
            payouts_sent = summary.payouts_sent,
            payouts_failed = summary.payouts_failed,
            "Sweep pass finished"
        );
        Ok(summary)
    }
}
