pub mod notification_sink;
pub mod payout_gateway;
