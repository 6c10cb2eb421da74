//! Entity factories with sensible defaults; tests override only what the
//! scenario cares about.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::entities::discount::Discount;
use crate::domain::entities::plan::{BillingInterval, PackagePlan, SubscriptionPlan};
use crate::domain::entities::service::ServiceAccount;
use crate::domain::entities::wallet::Wallet;

pub fn create_test_wallet(user_id: Uuid, overrides: impl FnOnce(&mut Wallet)) -> Wallet {
    let mut wallet = Wallet {
        id: Uuid::new_v4(),
        user_id,
        currency: "usd".to_string(),
        balance_cents: 0,
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
    };
    overrides(&mut wallet);
    wallet
}

pub fn create_test_discount(overrides: impl FnOnce(&mut Discount)) -> Discount {
    let mut discount = Discount {
        id: Uuid::new_v4(),
        service_id: None,
        code: None,
        percent: 10,
        starts_at: Utc::now() - chrono::Duration::days(1),
        ends_at: Utc::now() + chrono::Duration::days(30),
        created_at: Some(Utc::now()),
    };
    overrides(&mut discount);
    discount
}

pub fn create_test_account(
    service_id: Uuid,
    overrides: impl FnOnce(&mut ServiceAccount),
) -> ServiceAccount {
    let mut account = ServiceAccount {
        id: Uuid::new_v4(),
        service_id,
        label: "pool-1".to_string(),
        max_profiles: 5,
        created_at: Some(Utc::now()),
    };
    overrides(&mut account);
    account
}

pub fn create_test_plan(
    service_id: Uuid,
    overrides: impl FnOnce(&mut SubscriptionPlan),
) -> SubscriptionPlan {
    let mut plan = SubscriptionPlan {
        id: Uuid::new_v4(),
        service_id,
        name: "standard".to_string(),
        price_cents: 1000,
        currency: "usd".to_string(),
        interval: BillingInterval::Month,
        interval_count: 1,
        created_at: Some(Utc::now()),
    };
    overrides(&mut plan);
    plan
}

pub fn create_test_package_plan(
    package_id: Uuid,
    overrides: impl FnOnce(&mut PackagePlan),
) -> PackagePlan {
    let mut plan = PackagePlan {
        id: Uuid::new_v4(),
        package_id,
        name: "bundle".to_string(),
        price_cents: 2500,
        currency: "usd".to_string(),
        interval: BillingInterval::Month,
        interval_count: 1,
        created_at: Some(Utc::now()),
    };
    overrides(&mut plan);
    plan
}
