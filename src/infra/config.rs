use std::fmt::Debug;
use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::HeaderValue;
use secrecy::SecretString;

fn get_env<T: FromStr>(key: &str) -> T
where
    T::Err: Debug,
{
    std::env::var(key)
        .unwrap_or_else(|_| panic!("{key} must be set"))
        .parse()
        .unwrap_or_else(|e| panic!("{key} is invalid: {e:?}"))
}

fn get_env_default<T: FromStr>(key: &str, default: T) -> T
where
    T::Err: Debug,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|e| panic!("{key} is invalid: {e:?}")),
        Err(_) => default,
    }
}

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub db_max_connections: u32,
    pub cors_origin: HeaderValue,
    /// Seconds between sweep passes. Daily by default.
    pub sweep_interval_secs: u64,
    /// Failed renewal attempts before a subscription is expired.
    pub max_renewal_attempts: i32,
    /// How far ahead the sweep warns about subscriptions that will lapse.
    pub expiry_warn_days: i64,
    /// Upper bound on due subscriptions and pending payouts per pass.
    pub sweep_batch_size: i64,
    pub payout_gateway_url: String,
    pub payout_api_key: SecretString,
    /// Notification delivery endpoint. When unset, events are logged only.
    pub notifier_url: Option<String>,
    pub gateway_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "127.0.0.1:3001".parse().unwrap());
        let database_url: String = get_env("DATABASE_URL");
        let db_max_connections: u32 = get_env_default("DB_MAX_CONNECTIONS", 5);
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");
        let sweep_interval_secs: u64 = get_env_default("SWEEP_INTERVAL_SECS", 86_400);
        let max_renewal_attempts: i32 = get_env_default("MAX_RENEWAL_ATTEMPTS", 3);
        let expiry_warn_days: i64 = get_env_default("EXPIRY_WARN_DAYS", 3);
        let sweep_batch_size: i64 = get_env_default("SWEEP_BATCH_SIZE", 500);
        let payout_gateway_url: String = get_env("PAYOUT_GATEWAY_URL");
        let payout_api_key = SecretString::new(get_env::<String>("PAYOUT_API_KEY").into());
        let notifier_url: Option<String> = std::env::var("NOTIFIER_URL").ok();
        let gateway_timeout_secs: u64 = get_env_default("GATEWAY_TIMEOUT_SECS", 10);

        Self {
            bind_addr,
            database_url,
            db_max_connections,
            cors_origin,
            sweep_interval_secs,
            max_renewal_attempts,
            expiry_warn_days,
            sweep_batch_size,
            payout_gateway_url,
            payout_api_key,
            notifier_url,
            gateway_timeout_secs,
        }
    }
}
