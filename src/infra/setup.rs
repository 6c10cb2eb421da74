use std::fs::File;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{http::app_state::AppState, persistence::PostgresPersistence},
    application::ports::notification_sink::{NotificationEvent, NotificationSink, Notifier},
    application::ports::payout_gateway::PayoutGateway,
    application::use_cases::{
        discounts::{DiscountRepo, DiscountResolver},
        payments::{PaymentRecorder, PaymentRepo},
        payouts::{PayoutRepo, PayoutUseCases},
        profiles::{ProfileActivator, ProfileRepo, ServiceAccountRepo},
        renewal_sweep::RenewalSweep,
        subscriptions::{PlanRepo, SubscriptionRepo, SubscriptionUseCases},
        wallet_ledger::{WalletLedger, WalletRepo},
    },
    infra::{
        config::AppConfig,
        db::init_db,
        http_notifier::{HttpNotificationSink, LogNotificationSink},
        payout_client::HttpPayoutGateway,
    },
};

/// Everything main needs: the HTTP state plus the background pieces it
/// spawns.
pub struct AppRuntime {
    pub app_state: AppState,
    pub sweep: Arc<RenewalSweep>,
    pub notification_rx: UnboundedReceiver<NotificationEvent>,
    pub notification_sink: Arc<dyn NotificationSink>,
}

pub async fn init_runtime() -> anyhow::Result<AppRuntime> {
    let config = AppConfig::from_env();

    let pool = init_db(&config.database_url, config.db_max_connections).await?;
    let postgres_arc = Arc::new(PostgresPersistence::new(pool));

    let wallet_repo = postgres_arc.clone() as Arc<dyn WalletRepo>;
    let discount_repo = postgres_arc.clone() as Arc<dyn DiscountRepo>;
    let payment_repo = postgres_arc.clone() as Arc<dyn PaymentRepo>;
    let profile_repo = postgres_arc.clone() as Arc<dyn ProfileRepo>;
    let account_repo = postgres_arc.clone() as Arc<dyn ServiceAccountRepo>;
    let subscription_repo = postgres_arc.clone() as Arc<dyn SubscriptionRepo>;
    let plan_repo = postgres_arc.clone() as Arc<dyn PlanRepo>;
    let payout_repo = postgres_arc.clone() as Arc<dyn PayoutRepo>;

    let (notifier, notification_rx) = Notifier::channel();

    let wallet_ledger = Arc::new(WalletLedger::new(wallet_repo.clone()));
    let discounts = Arc::new(DiscountResolver::new(discount_repo));
    let payments = Arc::new(PaymentRecorder::new(payment_repo, wallet_repo));
    let profiles = Arc::new(ProfileActivator::new(profile_repo, account_repo));

    let subscriptions = Arc::new(SubscriptionUseCases::new(
        subscription_repo.clone(),
        plan_repo,
        discounts,
        payments.clone(),
        profiles,
        wallet_ledger.clone(),
        notifier.clone(),
        config.max_renewal_attempts,
    ));

    let gateway = Arc::new(HttpPayoutGateway::new(
        config.payout_gateway_url.clone(),
        config.payout_api_key.clone(),
        config.gateway_timeout_secs,
    )) as Arc<dyn PayoutGateway>;
    let payouts = Arc::new(PayoutUseCases::new(
        payout_repo,
        gateway,
        wallet_ledger.clone(),
    ));

    let sweep = Arc::new(RenewalSweep::new(
        subscription_repo,
        subscriptions.clone(),
        payouts.clone(),
        notifier,
        config.expiry_warn_days,
        config.sweep_batch_size,
    ));

    let notification_sink: Arc<dyn NotificationSink> = match &config.notifier_url {
        Some(url) => Arc::new(HttpNotificationSink::new(
            url.clone(),
            config.gateway_timeout_secs,
        )),
        None => Arc::new(LogNotificationSink),
    };

    Ok(AppRuntime {
        app_state: AppState {
            config: Arc::new(config),
            wallet_ledger,
            payments,
            subscriptions,
            payouts,
        },
        sweep,
        notification_rx,
        notification_sink,
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sharesub_api=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs)
    let file = File::create("app.log").expect("cannot create log file");
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
