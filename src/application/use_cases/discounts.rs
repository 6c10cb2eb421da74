use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{app_error::AppResult, domain::entities::discount::Discount};

#[async_trait]
pub trait DiscountRepo: Send + Sync {
    /// Discounts attached to a service, valid at `at`.
    async fn list_active_for_service(
        &self,
        service_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Vec<Discount>>;
    /// Global discounts valid at `at`.
    async fn list_active_global(&self, at: DateTime<Utc>) -> AppResult<Vec<Discount>>;
    /// Promo-code discount, if the code exists and is valid at `at`.
    async fn get_by_code(&self, code: &str, at: DateTime<Utc>) -> AppResult<Option<Discount>>;
}

/// Applies `percent` off a minor-unit price, rounding half-up.
pub fn apply_percent_off(price_cents: i64, percent: i32) -> i64 {
    let percent = percent.clamp(0, 100) as i64;
    (price_cents * (100 - percent) + 50) / 100
}

/// Read-only price resolution. Of all discounts valid at the given instant
/// (service-scoped, global, promo code) exactly the highest percentage
/// applies; discounts never stack.
pub struct DiscountResolver {
    discount_repo: Arc<dyn DiscountRepo>,
}

impl DiscountResolver {
    pub fn new(discount_repo: Arc<dyn DiscountRepo>) -> Self {
        Self { discount_repo }
    }

    pub async fn discounted_price(
        &self,
        price_cents: i64,
        service_id: Option<Uuid>,
        promo_code: Option<&str>,
        at: DateTime<Utc>,
    ) -> AppResult<i64> {
        let mut best = 0i32;

        if let Some(service_id) = service_id {
            for discount in self
                .discount_repo
                .list_active_for_service(service_id, at)
                .await?
            {
                best = best.max(discount.percent);
            }
        }

        for discount in self.discount_repo.list_active_global(at).await? {
            best = best.max(discount.percent);
        }

        if let Some(code) = promo_code {
            if let Some(discount) = self.discount_repo.get_by_code(code, at).await? {
                best = best.max(discount.percent);
            }
        }

        if best == 0 {
            return Ok(price_cents);
        }
        Ok(apply_percent_off(price_cents, best))
    }
}
