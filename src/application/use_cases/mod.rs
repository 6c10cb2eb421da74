pub mod discounts;
pub mod payments;
pub mod payouts;
pub mod profiles;
pub mod renewal_sweep;
pub mod subscriptions;
pub mod wallet_ledger;
