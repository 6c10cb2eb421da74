use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::notification_sink::Notifier,
    application::use_cases::{
        discounts::DiscountResolver,
        payments::{PaymentCharge, PaymentRecorder},
        profiles::ProfileActivator,
        wallet_ledger::WalletLedger,
    },
    domain::entities::{
        notification::NotificationKind,
        payment::Payment,
        plan::{BillingInterval, PackagePlan, SubscriptionPlan},
        subscription::{Subscription, SubscriptionStatus},
    },
};

// ============================================================================
// Repository input types
// ============================================================================

#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub user_id: Uuid,
    pub service_id: Option<Uuid>,
    pub plan_id: Option<Uuid>,
    pub package_id: Option<Uuid>,
    pub package_plan_id: Option<Uuid>,
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub auto_renew: bool,
}

/// Field changes applied together with a guarded status flip.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub to: SubscriptionStatus,
    pub auto_renew: Option<bool>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub expired_at: Option<DateTime<Utc>>,
}

/// Applied on a successful renewal: end-date extension, attempt reset,
/// optional staged-plan swap-in, status forced ACTIVE.
#[derive(Debug, Clone)]
pub struct RenewalUpdate {
    pub new_end_date: DateTime<Utc>,
    /// When set, becomes the subscription's plan and clears `next_plan_id`.
    pub plan_id: Option<Uuid>,
}

// ============================================================================
// Repository traits
// ============================================================================

#[async_trait]
pub trait SubscriptionRepo: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Subscription>>;
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Subscription>>;
    async fn create(&self, input: &NewSubscription) -> AppResult<Subscription>;
    /// Removes a never-activated row during creation compensation.
    async fn delete(&self, id: Uuid) -> AppResult<()>;
    async fn set_profile(&self, id: Uuid, profile_id: Option<Uuid>) -> AppResult<()>;
    /// Applies `change` only when the current status is one of `from`;
    /// `None` means the precondition did not hold. This is the guard that
    /// keeps a stale sweep or a racing API call from double-applying a
    /// transition.
    async fn transition(
        &self,
        id: Uuid,
        from: &[SubscriptionStatus],
        change: &StatusChange,
    ) -> AppResult<Option<Subscription>>;
    /// Guarded on a non-terminal current status.
    async fn mark_renewed(
        &self,
        id: Uuid,
        update: &RenewalUpdate,
    ) -> AppResult<Option<Subscription>>;
    /// Records one failed attempt. Guarded on `renewal_attempts` still being
    /// `attempts - 1` so two racing attempts cannot double-count.
    async fn record_renewal_failure(
        &self,
        id: Uuid,
        attempts: i32,
        reason: &str,
    ) -> AppResult<Option<Subscription>>;
    async fn stage_plan_change(
        &self,
        id: Uuid,
        next_plan_id: Uuid,
    ) -> AppResult<Option<Subscription>>;
    /// ACTIVE subscriptions whose end date has passed, oldest first.
    async fn list_due(&self, now: DateTime<Utc>, limit: i64) -> AppResult<Vec<Subscription>>;
    /// ACTIVE subscriptions ending in (now, until].
    async fn list_expiring_within(
        &self,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<Subscription>>;
}

#[async_trait]
pub trait PlanRepo: Send + Sync {
    async fn get_plan(&self, id: Uuid) -> AppResult<Option<SubscriptionPlan>>;
    async fn get_package_plan(&self, id: Uuid) -> AppResult<Option<PackagePlan>>;
    /// Ids of the services bundled under the package.
    async fn list_package_services(&self, package_id: Uuid) -> AppResult<Vec<Uuid>>;
}

// ============================================================================
// Result types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CreatedSubscription {
    pub subscription: Subscription,
    pub payment: Payment,
    /// Seats actually activated vs. services in the subscription. A
    /// shortfall on a package is a recorded degraded state, not a failure.
    pub activated_services: usize,
    pub requested_services: usize,
}

#[derive(Debug, Clone)]
pub enum RenewalOutcome {
    Renewed(Subscription),
    /// The attempt failed but the subscription stays ACTIVE.
    AttemptFailed {
        subscription: Subscription,
        attempts: i32,
        reason: String,
    },
    /// The attempt failed and exhausted the configured budget.
    Expired(Subscription),
}

/// Billing terms for the next cycle, flattened over single and package
/// plans.
struct PlanTerms {
    plan_id: Option<Uuid>,
    package_plan_id: Option<Uuid>,
    service_id: Option<Uuid>,
    price_cents: i64,
    currency: String,
    interval: BillingInterval,
    interval_count: i32,
    /// Set when a staged plan is being swapped in by this renewal.
    staged_swap: bool,
}

impl PlanTerms {
    fn period_end(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        self.interval.advance(from, self.interval_count)
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// The subscription state machine: INACTIVE -> ACTIVE -> {CANCELLED,
/// EXPIRED}. Wallet mutation always precedes subscription/profile changes;
/// once a payment is captured, seat failures degrade and log instead of
/// unwinding it.
pub struct SubscriptionUseCases {
    subscription_repo: Arc<dyn SubscriptionRepo>,
    plan_repo: Arc<dyn PlanRepo>,
    discounts: Arc<DiscountResolver>,
    payments: Arc<PaymentRecorder>,
    profiles: Arc<ProfileActivator>,
    ledger: Arc<WalletLedger>,
    notifier: Notifier,
    max_renewal_attempts: i32,
}

impl SubscriptionUseCases {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        subscription_repo: Arc<dyn SubscriptionRepo>,
        plan_repo: Arc<dyn PlanRepo>,
        discounts: Arc<DiscountResolver>,
        payments: Arc<PaymentRecorder>,
        profiles: Arc<ProfileActivator>,
        ledger: Arc<WalletLedger>,
        notifier: Notifier,
        max_renewal_attempts: i32,
    ) -> Self {
        Self {
            subscription_repo,
            plan_repo,
            discounts,
            payments,
            profiles,
            ledger,
            notifier,
            max_renewal_attempts,
        }
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Subscription> {
        self.subscription_repo
            .get_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Subscription>> {
        self.subscription_repo.list_by_user(user_id).await
    }

    // ========================================================================
    // Creation
    // ========================================================================

    pub async fn create_subscription(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        promo_code: Option<&str>,
    ) -> AppResult<CreatedSubscription> {
        let plan = self
            .plan_repo
            .get_plan(plan_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let now = Utc::now();

        let net = self
            .discounts
            .discounted_price(plan.price_cents, Some(plan.service_id), promo_code, now)
            .await?;

        // Payment first; if it fails nothing else exists yet.
        let payment = self
            .payments
            .create_payment(
                user_id,
                &PaymentCharge {
                    service_id: Some(plan.service_id),
                    plan_id: Some(plan.id),
                    package_plan_id: None,
                    currency: plan.currency.clone(),
                    amount_cents: net,
                },
            )
            .await?;

        let subscription = self
            .subscription_repo
            .create(&NewSubscription {
                user_id,
                service_id: Some(plan.service_id),
                plan_id: Some(plan.id),
                package_id: None,
                package_plan_id: None,
                status: SubscriptionStatus::Inactive,
                start_date: now,
                end_date: plan.period_end(now),
                auto_renew: true,
            })
            .await?;

        let profile = match self.profiles.activate(user_id, plan.service_id).await {
            Ok(profile) => profile,
            Err(e) => {
                self.compensate_failed_activation(&subscription, &payment)
                    .await;
                return Err(e);
            }
        };
        if let Err(e) = self
            .subscription_repo
            .set_profile(subscription.id, Some(profile.id))
            .await
        {
            self.release_seats(&subscription).await;
            self.compensate_failed_activation(&subscription, &payment)
                .await;
            return Err(e);
        }

        let subscription = match self.flip_created_active(subscription.id).await {
            Ok(active) => active,
            Err(e) => {
                self.release_seats(&subscription).await;
                self.compensate_failed_activation(&subscription, &payment)
                    .await;
                return Err(e);
            }
        };

        self.notifier.notify(
            NotificationKind::Activated,
            user_id,
            json!({
                "subscription_id": subscription.id,
                "service_id": plan.service_id,
                "end_date": subscription.end_date,
            }),
        );

        Ok(CreatedSubscription {
            subscription,
            payment,
            activated_services: 1,
            requested_services: 1,
        })
    }

    pub async fn create_package_subscription(
        &self,
        user_id: Uuid,
        package_plan_id: Uuid,
        promo_code: Option<&str>,
    ) -> AppResult<CreatedSubscription> {
        let plan = self
            .plan_repo
            .get_package_plan(package_plan_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let services = self.plan_repo.list_package_services(plan.package_id).await?;
        if services.is_empty() {
            return Err(AppError::InvalidInput(
                "package has no services".to_string(),
            ));
        }
        let now = Utc::now();

        let net = self
            .discounts
            .discounted_price(plan.price_cents, None, promo_code, now)
            .await?;

        let payment = self
            .payments
            .create_payment(
                user_id,
                &PaymentCharge {
                    service_id: None,
                    plan_id: None,
                    package_plan_id: Some(plan.id),
                    currency: plan.currency.clone(),
                    amount_cents: net,
                },
            )
            .await?;

        let subscription = self
            .subscription_repo
            .create(&NewSubscription {
                user_id,
                service_id: None,
                plan_id: None,
                package_id: Some(plan.package_id),
                package_plan_id: Some(plan.id),
                status: SubscriptionStatus::Inactive,
                start_date: now,
                end_date: plan.period_end(now),
                auto_renew: true,
            })
            .await?;

        let activated = match self.profiles.activate_bundle(user_id, &services).await {
            Ok(activated) => activated,
            Err(e) => {
                self.compensate_failed_activation(&subscription, &payment)
                    .await;
                return Err(e);
            }
        };
        if activated.len() < services.len() {
            tracing::warn!(
                subscription_id = %subscription.id,
                activated = activated.len(),
                requested = services.len(),
                "Package partially activated; missing seats will be retried at renewal"
            );
        }

        let subscription = match self.flip_created_active(subscription.id).await {
            Ok(active) => active,
            Err(e) => {
                self.release_seats(&subscription).await;
                self.compensate_failed_activation(&subscription, &payment)
                    .await;
                return Err(e);
            }
        };

        self.notifier.notify(
            NotificationKind::PackageActivated,
            user_id,
            json!({
                "subscription_id": subscription.id,
                "package_id": plan.package_id,
                "activated": activated.len(),
                "requested": services.len(),
            }),
        );

        Ok(CreatedSubscription {
            subscription,
            payment,
            activated_services: activated.len(),
            requested_services: services.len(),
        })
    }

    /// The payment record is immutable, so a creation that cannot deliver a
    /// single seat is compensated explicitly: credit the wallet back and
    /// remove the never-activated row.
    async fn compensate_failed_activation(&self, subscription: &Subscription, payment: &Payment) {
        if let Err(e) = self
            .ledger
            .credit(payment.wallet_id, payment.amount_cents)
            .await
        {
            tracing::error!(
                payment_id = %payment.id,
                error = %e,
                "Compensating credit failed; manual reconciliation required"
            );
        }
        if let Err(e) = self.subscription_repo.delete(subscription.id).await {
            tracing::error!(
                subscription_id = %subscription.id,
                error = %e,
                "Failed to remove never-activated subscription"
            );
        }
        tracing::warn!(
            payment_id = %payment.id,
            subscription_id = %subscription.id,
            "Subscription creation compensated after seat activation failure"
        );
    }

    async fn flip_created_active(&self, id: Uuid) -> AppResult<Subscription> {
        self.subscription_repo
            .transition(
                id,
                &[SubscriptionStatus::Inactive],
                &StatusChange {
                    to: SubscriptionStatus::Active,
                    auto_renew: None,
                    cancelled_at: None,
                    expired_at: None,
                },
            )
            .await?
            .ok_or_else(|| {
                AppError::Internal("subscription changed state during activation".to_string())
            })
    }

    // ========================================================================
    // Renewal
    // ========================================================================

    /// One renewal attempt. Never retries synchronously; failure is
    /// recorded as data and reported in the outcome so the sweep can
    /// aggregate instead of unwinding.
    pub async fn renew(&self, id: Uuid) -> AppResult<RenewalOutcome> {
        let subscription = self.get(id).await?;
        if subscription.status != SubscriptionStatus::Active {
            return Err(AppError::InvalidStateTransition {
                from: subscription.status.as_str().to_string(),
                attempted: "renew".to_string(),
            });
        }

        // The attempt budget may already be spent if a previous expiry was
        // interrupted after the final failure was recorded. Finish the
        // expiry instead of charging again.
        if subscription.renewal_attempts >= self.max_renewal_attempts {
            let expired = self.expire(subscription.id).await?;
            return Ok(RenewalOutcome::Expired(expired));
        }

        let terms = self.effective_terms(&subscription).await?;
        let now = Utc::now();
        let net = self
            .discounts
            .discounted_price(terms.price_cents, terms.service_id, None, now)
            .await?;

        let charge = PaymentCharge {
            service_id: terms.service_id,
            plan_id: terms.plan_id,
            package_plan_id: terms.package_plan_id,
            currency: terms.currency.clone(),
            amount_cents: net,
        };
        match self.payments.create_payment(subscription.user_id, &charge).await {
            Ok(payment) => {
                let update = RenewalUpdate {
                    new_end_date: terms.period_end(now),
                    plan_id: if terms.staged_swap { terms.plan_id } else { None },
                };
                let renewed = self
                    .subscription_repo
                    .mark_renewed(subscription.id, &update)
                    .await?
                    .ok_or_else(|| AppError::InvalidStateTransition {
                        from: "terminal".to_string(),
                        attempted: "renew".to_string(),
                    })?;

                // Heal seats that failed on a previous cycle. The payment is
                // captured, so failures here only degrade and log.
                self.heal_seats(&renewed).await;

                self.notifier.notify(
                    NotificationKind::Renewed,
                    renewed.user_id,
                    json!({
                        "subscription_id": renewed.id,
                        "end_date": renewed.end_date,
                        "payment_id": payment.id,
                    }),
                );
                Ok(RenewalOutcome::Renewed(renewed))
            }
            Err(e @ (AppError::InsufficientFunds { .. } | AppError::Gateway(_))) => {
                self.handle_failed_attempt(&subscription, e.to_string()).await
            }
            Err(other) => Err(other),
        }
    }

    async fn handle_failed_attempt(
        &self,
        subscription: &Subscription,
        reason: String,
    ) -> AppResult<RenewalOutcome> {
        let attempts = subscription.renewal_attempts + 1;

        if attempts >= self.max_renewal_attempts {
            // Record the final attempt, then run the expiry path.
            self.subscription_repo
                .record_renewal_failure(subscription.id, attempts, &reason)
                .await?;
            let expired = self.expire(subscription.id).await?;
            return Ok(RenewalOutcome::Expired(expired));
        }

        match self
            .subscription_repo
            .record_renewal_failure(subscription.id, attempts, &reason)
            .await?
        {
            Some(updated) => {
                self.notifier.notify(
                    NotificationKind::RenewalFailed,
                    subscription.user_id,
                    json!({
                        "subscription_id": subscription.id,
                        "attempts": attempts,
                        "reason": reason,
                    }),
                );
                Ok(RenewalOutcome::AttemptFailed {
                    subscription: updated,
                    attempts,
                    reason,
                })
            }
            None => {
                // A concurrent attempt already advanced the counter; report
                // the stored state without double-counting.
                let current = self.get(subscription.id).await?;
                let attempts = current.renewal_attempts;
                Ok(RenewalOutcome::AttemptFailed {
                    subscription: current,
                    attempts,
                    reason,
                })
            }
        }
    }

    async fn effective_terms(&self, subscription: &Subscription) -> AppResult<PlanTerms> {
        if subscription.is_package() {
            let id = subscription.package_plan_id.ok_or_else(|| {
                AppError::Internal("package subscription without package plan".to_string())
            })?;
            let plan = self
                .plan_repo
                .get_package_plan(id)
                .await?
                .ok_or(AppError::NotFound)?;
            return Ok(PlanTerms {
                plan_id: None,
                package_plan_id: Some(plan.id),
                service_id: None,
                price_cents: plan.price_cents,
                currency: plan.currency,
                interval: plan.interval,
                interval_count: plan.interval_count,
                staged_swap: false,
            });
        }

        // Staged plan wins over the current one.
        let staged = subscription.next_plan_id;
        let id = staged.or(subscription.plan_id).ok_or_else(|| {
            AppError::Internal("subscription without plan".to_string())
        })?;
        let plan = self
            .plan_repo
            .get_plan(id)
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(PlanTerms {
            plan_id: Some(plan.id),
            package_plan_id: None,
            service_id: Some(plan.service_id),
            price_cents: plan.price_cents,
            currency: plan.currency,
            interval: plan.interval,
            interval_count: plan.interval_count,
            staged_swap: staged.is_some(),
        })
    }

    /// Idempotent re-activation of every seat the subscription should hold.
    async fn heal_seats(&self, subscription: &Subscription) {
        if let Some(service_id) = subscription.service_id {
            match self.profiles.activate(subscription.user_id, service_id).await {
                Ok(profile) => {
                    if subscription.profile_id != Some(profile.id) {
                        if let Err(e) = self
                            .subscription_repo
                            .set_profile(subscription.id, Some(profile.id))
                            .await
                        {
                            tracing::warn!(
                                subscription_id = %subscription.id,
                                error = %e,
                                "Failed to relink healed profile"
                            );
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        subscription_id = %subscription.id,
                        service_id = %service_id,
                        error = %e,
                        "Seat activation failed during renewal"
                    );
                }
            }
            return;
        }

        let Some(package_id) = subscription.package_id else {
            return;
        };
        let services = match self.plan_repo.list_package_services(package_id).await {
            Ok(services) => services,
            Err(e) => {
                tracing::warn!(
                    subscription_id = %subscription.id,
                    error = %e,
                    "Failed to list package services during renewal"
                );
                return;
            }
        };
        match self
            .profiles
            .activate_bundle(subscription.user_id, &services)
            .await
        {
            Ok(activated) if activated.len() < services.len() => {
                tracing::warn!(
                    subscription_id = %subscription.id,
                    activated = activated.len(),
                    requested = services.len(),
                    "Package still partially activated after renewal"
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(
                    subscription_id = %subscription.id,
                    error = %e,
                    "Bundle activation failed during renewal"
                );
            }
        }
    }

    // ========================================================================
    // Plan change
    // ========================================================================

    /// Stages a plan to take effect at the next renewal; the current cycle
    /// keeps its paid terms.
    pub async fn stage_plan_change(&self, id: Uuid, plan_id: Uuid) -> AppResult<Subscription> {
        let subscription = self.get(id).await?;
        if subscription.is_package() {
            return Err(AppError::InvalidInput(
                "plan changes are not supported for package subscriptions".to_string(),
            ));
        }
        if subscription.status != SubscriptionStatus::Active {
            return Err(AppError::InvalidStateTransition {
                from: subscription.status.as_str().to_string(),
                attempted: "plan_change".to_string(),
            });
        }
        let plan = self
            .plan_repo
            .get_plan(plan_id)
            .await?
            .ok_or(AppError::NotFound)?;
        if Some(plan.service_id) != subscription.service_id {
            return Err(AppError::InvalidInput(
                "staged plan must target the same service".to_string(),
            ));
        }
        self.subscription_repo
            .stage_plan_change(subscription.id, plan.id)
            .await?
            .ok_or(AppError::NotFound)
    }

    // ========================================================================
    // Cancel / expire
    // ========================================================================

    /// Legal only from ACTIVE; anything else is rejected so a cancellation
    /// can never be double-processed.
    pub async fn cancel(&self, id: Uuid) -> AppResult<Subscription> {
        let subscription = self.get(id).await?;
        let now = Utc::now();
        let change = StatusChange {
            to: SubscriptionStatus::Cancelled,
            auto_renew: Some(false),
            cancelled_at: Some(now),
            expired_at: None,
        };
        let cancelled = match self
            .subscription_repo
            .transition(subscription.id, &[SubscriptionStatus::Active], &change)
            .await?
        {
            Some(subscription) => subscription,
            None => {
                let current = self.get(id).await?;
                return Err(AppError::InvalidStateTransition {
                    from: current.status.as_str().to_string(),
                    attempted: SubscriptionStatus::Cancelled.as_str().to_string(),
                });
            }
        };

        self.release_seats(&cancelled).await;

        let kind = if cancelled.is_package() {
            NotificationKind::PackageCancelled
        } else {
            NotificationKind::Cancelled
        };
        self.notifier.notify(
            kind,
            cancelled.user_id,
            json!({ "subscription_id": cancelled.id, "cancelled_at": now }),
        );
        Ok(cancelled)
    }

    /// Legal from any non-EXPIRED status; calling it on an EXPIRED
    /// subscription returns it unchanged, with no side effects.
    pub async fn expire(&self, id: Uuid) -> AppResult<Subscription> {
        let subscription = self.get(id).await?;
        if subscription.status == SubscriptionStatus::Expired {
            return Ok(subscription);
        }
        let now = Utc::now();
        let change = StatusChange {
            to: SubscriptionStatus::Expired,
            auto_renew: Some(false),
            cancelled_at: None,
            expired_at: Some(now),
        };
        let expired = match self
            .subscription_repo
            .transition(
                subscription.id,
                &[
                    SubscriptionStatus::Inactive,
                    SubscriptionStatus::Active,
                    SubscriptionStatus::Cancelled,
                ],
                &change,
            )
            .await?
        {
            Some(subscription) => subscription,
            None => {
                // Raced with another expiry; idempotent.
                let current = self.get(id).await?;
                if current.status == SubscriptionStatus::Expired {
                    return Ok(current);
                }
                return Err(AppError::InvalidStateTransition {
                    from: current.status.as_str().to_string(),
                    attempted: SubscriptionStatus::Expired.as_str().to_string(),
                });
            }
        };

        self.release_seats(&expired).await;

        self.notifier.notify(
            NotificationKind::Expired,
            expired.user_id,
            json!({ "subscription_id": expired.id, "expired_at": now }),
        );
        Ok(expired)
    }

    /// Deactivates every seat the subscription holds; failures are logged,
    /// never fatal to the already-committed transition.
    async fn release_seats(&self, subscription: &Subscription) {
        let services = if let Some(service_id) = subscription.service_id {
            vec![service_id]
        } else if let Some(package_id) = subscription.package_id {
            match self.plan_repo.list_package_services(package_id).await {
                Ok(services) => services,
                Err(e) => {
                    tracing::warn!(
                        subscription_id = %subscription.id,
                        error = %e,
                        "Failed to list package services during seat release"
                    );
                    return;
                }
            }
        } else {
            return;
        };

        for service_id in services {
            if let Err(e) = self
                .profiles
                .deactivate(subscription.user_id, service_id)
                .await
            {
                tracing::warn!(
                    subscription_id = %subscription.id,
                    service_id = %service_id,
                    error = %e,
                    "Seat deactivation failed"
                );
            }
        }
    }
}
