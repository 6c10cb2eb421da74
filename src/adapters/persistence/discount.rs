use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::discounts::DiscountRepo,
    domain::entities::discount::Discount,
};

fn row_to_discount(row: &sqlx::postgres::PgRow) -> Discount {
    Discount {
        id: row.get("id"),
        service_id: row.get("service_id"),
        code: row.get("code"),
        percent: row.get("percent"),
        starts_at: row.get("starts_at"),
        ends_at: row.get("ends_at"),
        created_at: row.get("created_at"),
    }
}

const SELECT_COLS: &str = "id, service_id, code, percent, starts_at, ends_at, created_at";

#[async_trait]
impl DiscountRepo for PostgresPersistence {
    async fn list_active_for_service(
        &self,
        service_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Vec<Discount>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM discounts
            WHERE service_id = $1 AND starts_at <= $2 AND ends_at > $2
            "#,
            SELECT_COLS
        ))
        .bind(service_id)
        .bind(at)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows.iter().map(row_to_discount).collect())
    }

    async fn list_active_global(&self, at: DateTime<Utc>) -> AppResult<Vec<Discount>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM discounts
            WHERE service_id IS NULL AND code IS NULL AND starts_at <= $1 AND ends_at > $1
            "#,
            SELECT_COLS
        ))
        .bind(at)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows.iter().map(row_to_discount).collect())
    }

    async fn get_by_code(&self, code: &str, at: DateTime<Utc>) -> AppResult<Option<Discount>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {} FROM discounts
            WHERE code = $1 AND starts_at <= $2 AND ends_at > $2
            "#,
            SELECT_COLS
        ))
        .bind(code)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_discount))
    }
}
