pub mod app;
pub mod config;
pub mod db;
pub mod http_notifier;
pub mod notification_worker;
pub mod payout_client;
pub mod renewal_worker;
pub mod setup;
