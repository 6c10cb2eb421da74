//! Test app state builder for HTTP-level testing: a full `AppState` wired
//! over in-memory mocks and a mock payout gateway.

use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState,
    application::ports::notification_sink::Notifier,
    application::use_cases::{
        discounts::DiscountResolver, payments::PaymentRecorder, payouts::PayoutUseCases,
        profiles::ProfileActivator, subscriptions::SubscriptionUseCases,
        wallet_ledger::WalletLedger,
    },
    domain::entities::wallet::Wallet,
    infra::config::AppConfig,
    test_utils::{
        InMemoryDiscountRepo, InMemoryPaymentRepo, InMemoryPlanRepo, InMemoryProfileRepo,
        InMemoryServiceAccountRepo, InMemorySubscriptionRepo, InMemoryWalletRepo,
        InMemoryPayoutRepo, MockPayoutGateway, create_test_account,
    },
};

fn test_config() -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        cors_origin: HeaderValue::from_static("http://localhost:3000"),
        sweep_interval_secs: 86_400,
        max_renewal_attempts: 3,
        expiry_warn_days: 3,
        sweep_batch_size: 500,
        payout_api_key: SecretString::new(String::from("test-key").into()),
        payout_gateway_url: "http://gateway.invalid".to_string(),
        notifier_url: None,
        gateway_timeout_secs: 5,
    }
}

/// Builder for an `AppState` backed entirely by mocks.
///
/// The repo handles stay public so tests can seed data and assert on
/// stored state directly.
pub struct TestAppStateBuilder {
    pub wallets: Arc<InMemoryWalletRepo>,
    pub payments: Arc<InMemoryPaymentRepo>,
    pub profiles: Arc<InMemoryProfileRepo>,
    pub accounts: Arc<InMemoryServiceAccountRepo>,
    pub subscriptions: Arc<InMemorySubscriptionRepo>,
    pub plans: Arc<InMemoryPlanRepo>,
    pub discounts: Arc<InMemoryDiscountRepo>,
    pub payouts: Arc<InMemoryPayoutRepo>,
    pub gateway: Arc<MockPayoutGateway>,
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        let wallets = Arc::new(InMemoryWalletRepo::default());
        let payments = Arc::new(InMemoryPaymentRepo::new(wallets.clone()));
        let profiles = Arc::new(InMemoryProfileRepo::new());
        let accounts = Arc::new(InMemoryServiceAccountRepo::new(vec![], profiles.clone()));
        Self {
            wallets,
            payments,
            profiles,
            accounts,
            subscriptions: Arc::new(InMemorySubscriptionRepo::new()),
            plans: Arc::new(InMemoryPlanRepo::new()),
            discounts: Arc::new(InMemoryDiscountRepo::default()),
            payouts: Arc::new(InMemoryPayoutRepo::new()),
            gateway: Arc::new(MockPayoutGateway::new()),
        }
    }

    pub fn with_wallet(self, wallet: Wallet) -> Self {
        self.wallets.add(wallet);
        self
    }

    /// Registers one shared account for `service_id` with the given seat
    /// capacity.
    pub fn with_service(self, service_id: Uuid, max_profiles: i32) -> Self {
        self.accounts
            .add(create_test_account(service_id, |a| {
                a.max_profiles = max_profiles;
            }));
        self
    }

    pub fn build(self) -> AppState {
        let config = Arc::new(test_config());
        let (notifier, mut rx) = Notifier::channel();
        // Keep the channel open; events are irrelevant to route tests.
        tokio::spawn(async move { while rx.recv().await.is_some() {} });

        let wallet_ledger = Arc::new(WalletLedger::new(self.wallets.clone()));
        let payments = Arc::new(PaymentRecorder::new(
            self.payments.clone(),
            self.wallets.clone(),
        ));
        let subscriptions = Arc::new(SubscriptionUseCases::new(
            self.subscriptions.clone(),
            self.plans.clone(),
            Arc::new(DiscountResolver::new(self.discounts.clone())),
            payments.clone(),
            Arc::new(ProfileActivator::new(
                self.profiles.clone(),
                self.accounts.clone(),
            )),
            wallet_ledger.clone(),
            notifier,
            config.max_renewal_attempts,
        ));
        let payouts = Arc::new(PayoutUseCases::new(
            self.payouts.clone(),
            self.gateway.clone(),
            wallet_ledger.clone(),
        ));

        AppState {
            config,
            wallet_ledger,
            payments,
            subscriptions,
            payouts,
        }
    }
}
