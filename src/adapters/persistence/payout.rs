use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::payouts::{NewPayout, PayoutRepo},
    domain::entities::payout::{ContributorPayout, PayoutStatus},
};

fn row_to_payout(row: &sqlx::postgres::PgRow) -> ContributorPayout {
    ContributorPayout {
        id: row.get("id"),
        user_id: row.get("user_id"),
        wallet_id: row.get("wallet_id"),
        amount_cents: row.get("amount_cents"),
        currency: row.get("currency"),
        destination_msisdn: row.get("destination_msisdn"),
        reference: row.get("reference"),
        status: row.get("status"),
        transaction_ref: row.get("transaction_ref"),
        failure_reason: row.get("failure_reason"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const SELECT_COLS: &str = r#"
    id, user_id, wallet_id, amount_cents, currency, destination_msisdn,
    reference, status, transaction_ref, failure_reason, created_at, updated_at
"#;

#[async_trait]
impl PayoutRepo for PostgresPersistence {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<ContributorPayout>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM contributor_payouts WHERE id = $1",
            SELECT_COLS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_payout))
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<ContributorPayout>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM contributor_payouts WHERE user_id = $1 ORDER BY created_at DESC",
            SELECT_COLS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows.iter().map(row_to_payout).collect())
    }

    async fn create(&self, input: &NewPayout) -> AppResult<ContributorPayout> {
        let id = Uuid::new_v4();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO contributor_payouts
                (id, user_id, wallet_id, amount_cents, currency,
                 destination_msisdn, reference, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(id)
        .bind(input.user_id)
        .bind(input.wallet_id)
        .bind(input.amount_cents)
        .bind(&input.currency)
        .bind(&input.destination_msisdn)
        .bind(&input.reference)
        .bind(PayoutStatus::Pending)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row_to_payout(&row))
    }

    async fn list_pending(&self, limit: i64) -> AppResult<Vec<ContributorPayout>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM contributor_payouts
            WHERE status = 'pending'
            ORDER BY created_at ASC
            LIMIT $1
            "#,
            SELECT_COLS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows.iter().map(row_to_payout).collect())
    }

    async fn mark_sent(
        &self,
        id: Uuid,
        transaction_ref: &str,
    ) -> AppResult<Option<ContributorPayout>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE contributor_payouts SET
                status = 'sent',
                transaction_ref = $2,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND status = 'pending'
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(id)
        .bind(transaction_ref)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_payout))
    }

    async fn mark_failed(&self, id: Uuid, reason: &str) -> AppResult<Option<ContributorPayout>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE contributor_payouts SET
                status = 'failed',
                failure_reason = $2,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND status = 'pending'
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(id)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_payout))
    }

    async fn mark_pending(&self, id: Uuid) -> AppResult<Option<ContributorPayout>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE contributor_payouts SET
                status = 'pending',
                failure_reason = NULL,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND status = 'failed'
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_payout))
    }

    async fn mark_reversed(&self, id: Uuid) -> AppResult<Option<ContributorPayout>> {
        // Status guard first; the compensating credit follows only when this
        // flip wins.
        let row = sqlx::query(&format!(
            r#"
            UPDATE contributor_payouts SET
                status = 'reversed',
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND status = 'failed'
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_payout))
    }
}
