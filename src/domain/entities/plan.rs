use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Billing interval unit. A plan period is `interval_count` of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "billing_interval", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BillingInterval {
    Day,
    Week,
    Month,
    Year,
}

impl BillingInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingInterval::Day => "day",
            BillingInterval::Week => "week",
            BillingInterval::Month => "month",
            BillingInterval::Year => "year",
        }
    }

    /// Advances `from` by `count` intervals. Month/year arithmetic clamps to
    /// the last day of the target month, per chrono.
    pub fn advance(&self, from: DateTime<Utc>, count: i32) -> DateTime<Utc> {
        let count = count.max(1);
        match self {
            BillingInterval::Day => from + chrono::Duration::days(count as i64),
            BillingInterval::Week => from + chrono::Duration::weeks(count as i64),
            BillingInterval::Month => from
                .checked_add_months(Months::new(count as u32))
                .unwrap_or(from),
            BillingInterval::Year => from
                .checked_add_months(Months::new(count as u32 * 12))
                .unwrap_or(from),
        }
    }
}

impl std::fmt::Display for BillingInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Priced terms for one service.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionPlan {
    pub id: Uuid,
    pub service_id: Uuid,
    pub name: String,
    pub price_cents: i64,
    pub currency: String,
    pub interval: BillingInterval,
    pub interval_count: i32,
    pub created_at: Option<DateTime<Utc>>,
}

impl SubscriptionPlan {
    pub fn period_end(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        self.interval.advance(from, self.interval_count)
    }
}

/// Priced terms for a service package.
#[derive(Debug, Clone, Serialize)]
pub struct PackagePlan {
    pub id: Uuid,
    pub package_id: Uuid,
    pub name: String,
    pub price_cents: i64,
    pub currency: String,
    pub interval: BillingInterval,
    pub interval_count: i32,
    pub created_at: Option<DateTime<Utc>>,
}

impl PackagePlan {
    pub fn period_end(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        self.interval.advance(from, self.interval_count)
    }
}
