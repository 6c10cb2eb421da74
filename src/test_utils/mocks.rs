//! In-memory repository and gateway doubles. Each one mirrors the guard
//! semantics of its Postgres counterpart (conditional debits, status-gated
//! transitions) so use-case tests exercise the real race rules.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::ports::payout_gateway::{
    GatewayPayoutStatus, PayoutGateway, PayoutReceipt, PayoutRequest,
};
use crate::application::use_cases::discounts::DiscountRepo;
use crate::application::use_cases::payments::{NewPayment, PaymentRepo};
use crate::application::use_cases::payouts::{NewPayout, PayoutRepo};
use crate::application::use_cases::profiles::{ProfileRepo, ServiceAccountRepo};
use crate::application::use_cases::subscriptions::{
    NewSubscription, PlanRepo, RenewalUpdate, StatusChange, SubscriptionRepo,
};
use crate::application::use_cases::wallet_ledger::WalletRepo;
use crate::domain::entities::discount::Discount;
use crate::domain::entities::payment::{Payment, PaymentStatus};
use crate::domain::entities::payout::{ContributorPayout, PayoutStatus};
use crate::domain::entities::plan::{PackagePlan, SubscriptionPlan};
use crate::domain::entities::profile::{Profile, ProfileStatus};
use crate::domain::entities::service::ServiceAccount;
use crate::domain::entities::subscription::{Subscription, SubscriptionStatus};
use crate::domain::entities::wallet::Wallet;

// ============================================================================
// Wallets
// ============================================================================

#[derive(Default)]
pub struct InMemoryWalletRepo {
    wallets: Mutex<HashMap<Uuid, Wallet>>,
}

impl InMemoryWalletRepo {
    pub fn with_wallets(wallets: Vec<Wallet>) -> Self {
        Self {
            wallets: Mutex::new(wallets.into_iter().map(|w| (w.id, w)).collect()),
        }
    }

    pub fn add(&self, wallet: Wallet) {
        self.wallets.lock().unwrap().insert(wallet.id, wallet);
    }

    pub fn get_by_user_sync(&self, user_id: Uuid) -> Option<Wallet> {
        self.wallets
            .lock()
            .unwrap()
            .values()
            .find(|w| w.user_id == user_id)
            .cloned()
    }
}

#[async_trait]
impl WalletRepo for InMemoryWalletRepo {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Wallet>> {
        Ok(self.wallets.lock().unwrap().get(&id).cloned())
    }

    async fn get_by_user(&self, user_id: Uuid) -> AppResult<Option<Wallet>> {
        Ok(self.get_by_user_sync(user_id))
    }

    async fn try_debit(&self, id: Uuid, amount_cents: i64) -> AppResult<Option<Wallet>> {
        let mut wallets = self.wallets.lock().unwrap();
        match wallets.get_mut(&id) {
            Some(wallet) if wallet.balance_cents >= amount_cents => {
                wallet.balance_cents -= amount_cents;
                wallet.updated_at = Some(Utc::now());
                Ok(Some(wallet.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn credit(&self, id: Uuid, amount_cents: i64) -> AppResult<Option<Wallet>> {
        let mut wallets = self.wallets.lock().unwrap();
        match wallets.get_mut(&id) {
            Some(wallet) => {
                wallet.balance_cents += amount_cents;
                wallet.updated_at = Some(Utc::now());
                Ok(Some(wallet.clone()))
            }
            None => Ok(None),
        }
    }
}

// ============================================================================
// Discounts
// ============================================================================

#[derive(Default)]
pub struct InMemoryDiscountRepo {
    discounts: Mutex<Vec<Discount>>,
}

impl InMemoryDiscountRepo {
    pub fn with_discounts(discounts: Vec<Discount>) -> Self {
        Self {
            discounts: Mutex::new(discounts),
        }
    }

    pub fn add(&self, discount: Discount) {
        self.discounts.lock().unwrap().push(discount);
    }
}

#[async_trait]
impl DiscountRepo for InMemoryDiscountRepo {
    async fn list_active_for_service(
        &self,
        service_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Vec<Discount>> {
        Ok(self
            .discounts
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.service_id == Some(service_id) && d.is_valid_at(at))
            .cloned()
            .collect())
    }

    async fn list_active_global(&self, at: DateTime<Utc>) -> AppResult<Vec<Discount>> {
        Ok(self
            .discounts
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.is_global() && d.is_valid_at(at))
            .cloned()
            .collect())
    }

    async fn get_by_code(&self, code: &str, at: DateTime<Utc>) -> AppResult<Option<Discount>> {
        Ok(self
            .discounts
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.code.as_deref() == Some(code) && d.is_valid_at(at))
            .cloned())
    }
}

// ============================================================================
// Payments
// ============================================================================

pub struct InMemoryPaymentRepo {
    payments: Mutex<Vec<Payment>>,
    wallets: Arc<InMemoryWalletRepo>,
    fail_next_insert: AtomicBool,
}

impl InMemoryPaymentRepo {
    pub fn new(wallets: Arc<InMemoryWalletRepo>) -> Self {
        Self {
            payments: Mutex::new(Vec::new()),
            wallets,
            fail_next_insert: AtomicBool::new(false),
        }
    }

    /// The next `record_paid` fails after the debit, exercising the
    /// rollback path of the atomic unit.
    pub fn fail_next_insert(&self) {
        self.fail_next_insert.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PaymentRepo for InMemoryPaymentRepo {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Payment>> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Payment>> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn record_paid(&self, input: &NewPayment) -> AppResult<Payment> {
        let debited = self
            .wallets
            .try_debit(input.wallet_id, input.amount_cents)
            .await?;
        if debited.is_none() {
            let available = self
                .wallets
                .get_by_id(input.wallet_id)
                .await?
                .map(|w| w.balance_cents)
                .unwrap_or(0);
            return Err(AppError::InsufficientFunds {
                required_cents: input.amount_cents,
                available_cents: available,
            });
        }
        if self.fail_next_insert.swap(false, Ordering::SeqCst) {
            // Simulated transaction rollback: the debit comes back too.
            self.wallets
                .credit(input.wallet_id, input.amount_cents)
                .await?;
            return Err(AppError::Database("injected insert failure".to_string()));
        }
        let payment = Payment {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            wallet_id: input.wallet_id,
            service_id: input.service_id,
            plan_id: input.plan_id,
            package_plan_id: input.package_plan_id,
            currency: input.currency.clone(),
            amount_cents: input.amount_cents,
            status: PaymentStatus::Paid,
            created_at: Some(Utc::now()),
        };
        self.payments.lock().unwrap().push(payment.clone());
        Ok(payment)
    }
}

// ============================================================================
// Profiles and service accounts
// ============================================================================

#[derive(Default)]
pub struct InMemoryProfileRepo {
    profiles: Mutex<HashMap<Uuid, Profile>>,
}

impl InMemoryProfileRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.profiles.lock().unwrap().len()
    }

    fn active_count_for_account(&self, account_id: Uuid) -> usize {
        self.profiles
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.account_id == account_id && p.status == ProfileStatus::Active)
            .count()
    }
}

#[async_trait]
impl ProfileRepo for InMemoryProfileRepo {
    async fn get_active(&self, user_id: Uuid, service_id: Uuid) -> AppResult<Option<Profile>> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .values()
            .find(|p| {
                p.user_id == user_id
                    && p.service_id == service_id
                    && p.status == ProfileStatus::Active
            })
            .cloned())
    }

    async fn get_inactive(&self, user_id: Uuid, service_id: Uuid) -> AppResult<Option<Profile>> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .values()
            .find(|p| {
                p.user_id == user_id
                    && p.service_id == service_id
                    && p.status == ProfileStatus::Inactive
            })
            .cloned())
    }

    async fn try_activate(&self, profile_id: Uuid) -> AppResult<Option<Profile>> {
        let mut profiles = self.profiles.lock().unwrap();
        match profiles.get_mut(&profile_id) {
            Some(profile) if profile.status == ProfileStatus::Inactive => {
                profile.status = ProfileStatus::Active;
                profile.updated_at = Some(Utc::now());
                Ok(Some(profile.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn create_active(
        &self,
        user_id: Uuid,
        service_id: Uuid,
        account_id: Uuid,
    ) -> AppResult<Profile> {
        let profile = Profile {
            id: Uuid::new_v4(),
            user_id,
            service_id,
            account_id,
            status: ProfileStatus::Active,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        };
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn deactivate_all(&self, user_id: Uuid, service_id: Uuid) -> AppResult<u64> {
        let mut profiles = self.profiles.lock().unwrap();
        let mut flipped = 0u64;
        for profile in profiles.values_mut() {
            if profile.user_id == user_id
                && profile.service_id == service_id
                && profile.status == ProfileStatus::Active
            {
                profile.status = ProfileStatus::Inactive;
                profile.updated_at = Some(Utc::now());
                flipped += 1;
            }
        }
        Ok(flipped)
    }
}

pub struct InMemoryServiceAccountRepo {
    accounts: Mutex<Vec<ServiceAccount>>,
    profiles: Arc<InMemoryProfileRepo>,
}

impl InMemoryServiceAccountRepo {
    pub fn new(accounts: Vec<ServiceAccount>, profiles: Arc<InMemoryProfileRepo>) -> Self {
        Self {
            accounts: Mutex::new(accounts),
            profiles,
        }
    }

    pub fn add(&self, account: ServiceAccount) {
        self.accounts.lock().unwrap().push(account);
    }
}

#[async_trait]
impl ServiceAccountRepo for InMemoryServiceAccountRepo {
    async fn find_with_capacity(&self, service_id: Uuid) -> AppResult<Option<ServiceAccount>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .iter()
            .find(|a| {
                a.service_id == service_id
                    && self.profiles.active_count_for_account(a.id) < a.max_profiles as usize
            })
            .cloned())
    }
}

// ============================================================================
// Subscriptions
// ============================================================================

#[derive(Default)]
pub struct InMemorySubscriptionRepo {
    subscriptions: Mutex<HashMap<Uuid, Subscription>>,
    fail_next_set_profile: AtomicBool,
}

impl InMemorySubscriptionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `set_profile` call fail, simulating a write error
    /// after the seat was already activated.
    pub fn fail_next_set_profile(&self) {
        self.fail_next_set_profile.store(true, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.subscriptions.lock().unwrap().len()
    }

    pub fn get_sync(&self, id: Uuid) -> Option<Subscription> {
        self.subscriptions.lock().unwrap().get(&id).cloned()
    }

    /// Direct state surgery for test setup (backdating end dates, forcing
    /// attempt counters).
    pub fn update_sync(&self, id: Uuid, f: impl FnOnce(&mut Subscription)) {
        if let Some(subscription) = self.subscriptions.lock().unwrap().get_mut(&id) {
            f(subscription);
        }
    }
}

#[async_trait]
impl SubscriptionRepo for InMemorySubscriptionRepo {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Subscription>> {
        Ok(self.get_sync(id))
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Subscription>> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create(&self, input: &NewSubscription) -> AppResult<Subscription> {
        let now = Utc::now();
        let subscription = Subscription {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            service_id: input.service_id,
            plan_id: input.plan_id,
            package_id: input.package_id,
            package_plan_id: input.package_plan_id,
            profile_id: None,
            next_plan_id: None,
            status: input.status,
            start_date: input.start_date,
            end_date: input.end_date,
            auto_renew: input.auto_renew,
            renewal_attempts: 0,
            failure_reason: None,
            cancelled_at: None,
            expired_at: None,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.subscriptions
            .lock()
            .unwrap()
            .insert(subscription.id, subscription.clone());
        Ok(subscription)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.subscriptions.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn set_profile(&self, id: Uuid, profile_id: Option<Uuid>) -> AppResult<()> {
        if self.fail_next_set_profile.swap(false, Ordering::SeqCst) {
            return Err(AppError::Database(
                "injected profile link failure".to_string(),
            ));
        }
        if let Some(subscription) = self.subscriptions.lock().unwrap().get_mut(&id) {
            subscription.profile_id = profile_id;
            subscription.updated_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn transition(
        &self,
        id: Uuid,
        from: &[SubscriptionStatus],
        change: &StatusChange,
    ) -> AppResult<Option<Subscription>> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        match subscriptions.get_mut(&id) {
            Some(subscription) if from.contains(&subscription.status) => {
                subscription.status = change.to;
                if let Some(auto_renew) = change.auto_renew {
                    subscription.auto_renew = auto_renew;
                }
                if change.cancelled_at.is_some() {
                    subscription.cancelled_at = change.cancelled_at;
                }
                if change.expired_at.is_some() {
                    subscription.expired_at = change.expired_at;
                }
                subscription.updated_at = Some(Utc::now());
                Ok(Some(subscription.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn mark_renewed(
        &self,
        id: Uuid,
        update: &RenewalUpdate,
    ) -> AppResult<Option<Subscription>> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        match subscriptions.get_mut(&id) {
            Some(subscription) if !subscription.status.is_terminal() => {
                subscription.status = SubscriptionStatus::Active;
                subscription.end_date = update.new_end_date;
                subscription.renewal_attempts = 0;
                subscription.failure_reason = None;
                if let Some(plan_id) = update.plan_id {
                    subscription.plan_id = Some(plan_id);
                    subscription.next_plan_id = None;
                }
                subscription.updated_at = Some(Utc::now());
                Ok(Some(subscription.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn record_renewal_failure(
        &self,
        id: Uuid,
        attempts: i32,
        reason: &str,
    ) -> AppResult<Option<Subscription>> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        match subscriptions.get_mut(&id) {
            Some(subscription)
                if subscription.status == SubscriptionStatus::Active
                    && subscription.renewal_attempts == attempts - 1 =>
            {
                subscription.renewal_attempts = attempts;
                subscription.failure_reason = Some(reason.to_string());
                subscription.updated_at = Some(Utc::now());
                Ok(Some(subscription.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn stage_plan_change(
        &self,
        id: Uuid,
        next_plan_id: Uuid,
    ) -> AppResult<Option<Subscription>> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        match subscriptions.get_mut(&id) {
            Some(subscription) => {
                subscription.next_plan_id = Some(next_plan_id);
                subscription.updated_at = Some(Utc::now());
                Ok(Some(subscription.clone()))
            }
            None => Ok(None),
        }
    }

    async fn list_due(&self, now: DateTime<Utc>, limit: i64) -> AppResult<Vec<Subscription>> {
        let mut due: Vec<Subscription> = self
            .subscriptions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.is_due(now))
            .cloned()
            .collect();
        due.sort_by_key(|s| s.end_date);
        due.truncate(limit as usize);
        Ok(due)
    }

    async fn list_expiring_within(
        &self,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<Subscription>> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .values()
            .filter(|s| {
                s.status == SubscriptionStatus::Active && s.end_date > now && s.end_date <= until
            })
            .cloned()
            .collect())
    }
}

// ============================================================================
// Plans
// ============================================================================

#[derive(Default)]
pub struct InMemoryPlanRepo {
    plans: Mutex<Vec<SubscriptionPlan>>,
    package_plans: Mutex<Vec<PackagePlan>>,
    package_services: Mutex<HashMap<Uuid, Vec<Uuid>>>,
}

impl InMemoryPlanRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_plan(&self, plan: SubscriptionPlan) {
        self.plans.lock().unwrap().push(plan);
    }

    pub fn insert_package_plan(&self, plan: PackagePlan) {
        self.package_plans.lock().unwrap().push(plan);
    }

    pub fn set_package_services(&self, package_id: Uuid, services: Vec<Uuid>) {
        self.package_services
            .lock()
            .unwrap()
            .insert(package_id, services);
    }

    pub fn first_plan_sync(&self) -> Option<SubscriptionPlan> {
        self.plans.lock().unwrap().first().cloned()
    }
}

#[async_trait]
impl PlanRepo for InMemoryPlanRepo {
    async fn get_plan(&self, id: Uuid) -> AppResult<Option<SubscriptionPlan>> {
        Ok(self
            .plans
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn get_package_plan(&self, id: Uuid) -> AppResult<Option<PackagePlan>> {
        Ok(self
            .package_plans
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_package_services(&self, package_id: Uuid) -> AppResult<Vec<Uuid>> {
        Ok(self
            .package_services
            .lock()
            .unwrap()
            .get(&package_id)
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// Payouts
// ============================================================================

#[derive(Default)]
pub struct InMemoryPayoutRepo {
    payouts: Mutex<HashMap<Uuid, ContributorPayout>>,
}

impl InMemoryPayoutRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PayoutRepo for InMemoryPayoutRepo {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<ContributorPayout>> {
        Ok(self.payouts.lock().unwrap().get(&id).cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<ContributorPayout>> {
        Ok(self
            .payouts
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create(&self, input: &NewPayout) -> AppResult<ContributorPayout> {
        let now = Utc::now();
        let payout = ContributorPayout {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            wallet_id: input.wallet_id,
            amount_cents: input.amount_cents,
            currency: input.currency.clone(),
            destination_msisdn: input.destination_msisdn.clone(),
            reference: input.reference.clone(),
            status: PayoutStatus::Pending,
            transaction_ref: None,
            failure_reason: None,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.payouts
            .lock()
            .unwrap()
            .insert(payout.id, payout.clone());
        Ok(payout)
    }

    async fn list_pending(&self, limit: i64) -> AppResult<Vec<ContributorPayout>> {
        let mut pending: Vec<ContributorPayout> = self
            .payouts
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.status == PayoutStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by_key(|p| p.created_at);
        pending.truncate(limit as usize);
        Ok(pending)
    }

    async fn mark_sent(
        &self,
        id: Uuid,
        transaction_ref: &str,
    ) -> AppResult<Option<ContributorPayout>> {
        self.guarded(id, PayoutStatus::Pending, |payout| {
            payout.status = PayoutStatus::Sent;
            payout.transaction_ref = Some(transaction_ref.to_string());
        })
    }

    async fn mark_failed(&self, id: Uuid, reason: &str) -> AppResult<Option<ContributorPayout>> {
        self.guarded(id, PayoutStatus::Pending, |payout| {
            payout.status = PayoutStatus::Failed;
            payout.failure_reason = Some(reason.to_string());
        })
    }

    async fn mark_pending(&self, id: Uuid) -> AppResult<Option<ContributorPayout>> {
        self.guarded(id, PayoutStatus::Failed, |payout| {
            payout.status = PayoutStatus::Pending;
            payout.failure_reason = None;
        })
    }

    async fn mark_reversed(&self, id: Uuid) -> AppResult<Option<ContributorPayout>> {
        self.guarded(id, PayoutStatus::Failed, |payout| {
            payout.status = PayoutStatus::Reversed;
        })
    }
}

impl InMemoryPayoutRepo {
    fn guarded(
        &self,
        id: Uuid,
        expected: PayoutStatus,
        f: impl FnOnce(&mut ContributorPayout),
    ) -> AppResult<Option<ContributorPayout>> {
        let mut payouts = self.payouts.lock().unwrap();
        match payouts.get_mut(&id) {
            Some(payout) if payout.status == expected => {
                f(payout);
                payout.updated_at = Some(Utc::now());
                Ok(Some(payout.clone()))
            }
            _ => Ok(None),
        }
    }
}

// ============================================================================
// Payout gateway
// ============================================================================

#[derive(Default)]
pub struct MockPayoutGateway {
    fail_next: Mutex<Option<String>>,
    reject_next: AtomicBool,
    requests: Mutex<Vec<PayoutRequest>>,
}

impl MockPayoutGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, reason: &str) {
        *self.fail_next.lock().unwrap() = Some(reason.to_string());
    }

    pub fn reject_next(&self) {
        self.reject_next.store(true, Ordering::SeqCst);
    }

    pub fn last_request(&self) -> Option<PayoutRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl PayoutGateway for MockPayoutGateway {
    async fn payout(&self, request: &PayoutRequest) -> AppResult<PayoutReceipt> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(reason) = self.fail_next.lock().unwrap().take() {
            return Err(AppError::Gateway(reason));
        }
        if self.reject_next.swap(false, Ordering::SeqCst) {
            return Ok(PayoutReceipt {
                transaction_ref: format!("mock-{}", Uuid::new_v4()),
                status: GatewayPayoutStatus::Rejected,
            });
        }
        Ok(PayoutReceipt {
            transaction_ref: format!("mock-{}", Uuid::new_v4()),
            status: GatewayPayoutStatus::Settled,
        })
    }
}
