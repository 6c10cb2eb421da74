use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::subscriptions::PlanRepo,
    domain::entities::plan::{PackagePlan, SubscriptionPlan},
};

fn row_to_plan(row: &sqlx::postgres::PgRow) -> SubscriptionPlan {
    SubscriptionPlan {
        id: row.get("id"),
        service_id: row.get("service_id"),
        name: row.get("name"),
        price_cents: row.get("price_cents"),
        currency: row.get("currency"),
        interval: row.get("interval"),
        interval_count: row.get("interval_count"),
        created_at: row.get("created_at"),
    }
}

fn row_to_package_plan(row: &sqlx::postgres::PgRow) -> PackagePlan {
    PackagePlan {
        id: row.get("id"),
        package_id: row.get("package_id"),
        name: row.get("name"),
        price_cents: row.get("price_cents"),
        currency: row.get("currency"),
        interval: row.get("interval"),
        interval_count: row.get("interval_count"),
        created_at: row.get("created_at"),
    }
}

const PLAN_COLS: &str =
    "id, service_id, name, price_cents, currency, interval, interval_count, created_at";
const PACKAGE_PLAN_COLS: &str =
    "id, package_id, name, price_cents, currency, interval, interval_count, created_at";

#[async_trait]
impl PlanRepo for PostgresPersistence {
    async fn get_plan(&self, id: Uuid) -> AppResult<Option<SubscriptionPlan>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM subscription_plans WHERE id = $1",
            PLAN_COLS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_plan))
    }

    async fn get_package_plan(&self, id: Uuid) -> AppResult<Option<PackagePlan>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM package_plans WHERE id = $1",
            PACKAGE_PLAN_COLS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_package_plan))
    }

    async fn list_package_services(&self, package_id: Uuid) -> AppResult<Vec<Uuid>> {
        let rows = sqlx::query(
            "SELECT service_id FROM package_services WHERE package_id = $1 ORDER BY service_id",
        )
        .bind(package_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows.iter().map(|row| row.get("service_id")).collect())
    }
}
