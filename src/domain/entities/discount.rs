use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A time-bounded percentage discount. Scoped to one service, global
/// (`service_id` is `None`), or redeemable by promo code. Discounts never
/// stack; the resolver picks the single highest applicable percentage.
#[derive(Debug, Clone, Serialize)]
pub struct Discount {
    pub id: Uuid,
    pub service_id: Option<Uuid>,
    pub code: Option<String>,
    pub percent: i32,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Discount {
    pub fn is_global(&self) -> bool {
        self.service_id.is_none() && self.code.is_none()
    }

    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.starts_at <= at && at < self.ends_at
    }
}
