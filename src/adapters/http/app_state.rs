use std::sync::Arc;

use crate::{
    application::use_cases::{
        payments::PaymentRecorder, payouts::PayoutUseCases, subscriptions::SubscriptionUseCases,
        wallet_ledger::WalletLedger,
    },
    infra::config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub wallet_ledger: Arc<WalletLedger>,
    pub payments: Arc<PaymentRecorder>,
    pub subscriptions: Arc<SubscriptionUseCases>,
    pub payouts: Arc<PayoutUseCases>,
}
