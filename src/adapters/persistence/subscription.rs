use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::subscriptions::{
        NewSubscription, RenewalUpdate, StatusChange, SubscriptionRepo,
    },
    domain::entities::subscription::{Subscription, SubscriptionStatus},
};

fn row_to_subscription(row: &sqlx::postgres::PgRow) -> Subscription {
    Subscription {
        id: row.get("id"),
        user_id: row.get("user_id"),
        service_id: row.get("service_id"),
        plan_id: row.get("plan_id"),
        package_id: row.get("package_id"),
        package_plan_id: row.get("package_plan_id"),
        profile_id: row.get("profile_id"),
        next_plan_id: row.get("next_plan_id"),
        status: row.get("status"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        auto_renew: row.get("auto_renew"),
        renewal_attempts: row.get("renewal_attempts"),
        failure_reason: row.get("failure_reason"),
        cancelled_at: row.get("cancelled_at"),
        expired_at: row.get("expired_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const SELECT_COLS: &str = r#"
    id, user_id, service_id, plan_id, package_id, package_plan_id,
    profile_id, next_plan_id, status, start_date, end_date, auto_renew,
    renewal_attempts, failure_reason, cancelled_at, expired_at,
    created_at, updated_at
"#;

#[async_trait]
impl SubscriptionRepo for PostgresPersistence {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Subscription>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE id = $1",
            SELECT_COLS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_subscription))
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Subscription>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE user_id = $1 ORDER BY created_at DESC",
            SELECT_COLS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows.iter().map(row_to_subscription).collect())
    }

    async fn create(&self, input: &NewSubscription) -> AppResult<Subscription> {
        let id = Uuid::new_v4();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO subscriptions
                (id, user_id, service_id, plan_id, package_id, package_plan_id,
                 status, start_date, end_date, auto_renew)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(id)
        .bind(input.user_id)
        .bind(input.service_id)
        .bind(input.plan_id)
        .bind(input.package_id)
        .bind(input.package_plan_id)
        .bind(input.status)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.auto_renew)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row_to_subscription(&row))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }

    async fn set_profile(&self, id: Uuid, profile_id: Option<Uuid>) -> AppResult<()> {
        sqlx::query(
            "UPDATE subscriptions SET profile_id = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $1",
        )
        .bind(id)
        .bind(profile_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    async fn transition(
        &self,
        id: Uuid,
        from: &[SubscriptionStatus],
        change: &StatusChange,
    ) -> AppResult<Option<Subscription>> {
        // Status precondition inside the UPDATE; a stale caller gets zero
        // rows back instead of clobbering a concurrent transition.
        let row = sqlx::query(&format!(
            r#"
            UPDATE subscriptions SET
                status = $2,
                auto_renew = COALESCE($3, auto_renew),
                cancelled_at = COALESCE($4, cancelled_at),
                expired_at = COALESCE($5, expired_at),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND status = ANY($6)
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(id)
        .bind(change.to)
        .bind(change.auto_renew)
        .bind(change.cancelled_at)
        .bind(change.expired_at)
        .bind(from)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_subscription))
    }

    async fn mark_renewed(
        &self,
        id: Uuid,
        update: &RenewalUpdate,
    ) -> AppResult<Option<Subscription>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE subscriptions SET
                status = 'active',
                end_date = $2,
                plan_id = COALESCE($3, plan_id),
                next_plan_id = CASE WHEN $3 IS NOT NULL THEN NULL ELSE next_plan_id END,
                renewal_attempts = 0,
                failure_reason = NULL,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND status NOT IN ('cancelled', 'expired')
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(id)
        .bind(update.new_end_date)
        .bind(update.plan_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_subscription))
    }

    async fn record_renewal_failure(
        &self,
        id: Uuid,
        attempts: i32,
        reason: &str,
    ) -> AppResult<Option<Subscription>> {
        // The attempt-counter guard keeps two racing sweep passes from
        // double-counting one failure.
        let row = sqlx::query(&format!(
            r#"
            UPDATE subscriptions SET
                renewal_attempts = $2,
                failure_reason = $3,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND status = 'active' AND renewal_attempts = $2 - 1
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(id)
        .bind(attempts)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_subscription))
    }

    async fn stage_plan_change(
        &self,
        id: Uuid,
        next_plan_id: Uuid,
    ) -> AppResult<Option<Subscription>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE subscriptions SET
                next_plan_id = $2,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(id)
        .bind(next_plan_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_subscription))
    }

    async fn list_due(&self, now: DateTime<Utc>, limit: i64) -> AppResult<Vec<Subscription>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM subscriptions
            WHERE status = 'active' AND end_date <= $1
            ORDER BY end_date ASC
            LIMIT $2
            "#,
            SELECT_COLS
        ))
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows.iter().map(row_to_subscription).collect())
    }

    async fn list_expiring_within(
        &self,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<Subscription>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM subscriptions
            WHERE status = 'active' AND end_date > $1 AND end_date <= $2
            ORDER BY end_date ASC
            "#,
            SELECT_COLS
        ))
        .bind(now)
        .bind(until)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows.iter().map(row_to_subscription).collect())
    }
}
