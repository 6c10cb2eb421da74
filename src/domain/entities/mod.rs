pub mod discount;
pub mod notification;
pub mod payment;
pub mod payout;
pub mod plan;
pub mod profile;
pub mod service;
pub mod subscription;
pub mod wallet;
