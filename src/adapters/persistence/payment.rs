use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::payments::{NewPayment, PaymentRepo},
    domain::entities::payment::{Payment, PaymentStatus},
};

fn row_to_payment(row: &sqlx::postgres::PgRow) -> Payment {
    Payment {
        id: row.get("id"),
        user_id: row.get("user_id"),
        wallet_id: row.get("wallet_id"),
        service_id: row.get("service_id"),
        plan_id: row.get("plan_id"),
        package_plan_id: row.get("package_plan_id"),
        currency: row.get("currency"),
        amount_cents: row.get("amount_cents"),
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

const SELECT_COLS: &str = r#"
    id, user_id, wallet_id, service_id, plan_id, package_plan_id,
    currency, amount_cents, status, created_at
"#;

#[async_trait]
impl PaymentRepo for PostgresPersistence {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Payment>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM payments WHERE id = $1",
            SELECT_COLS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_payment))
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Payment>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM payments WHERE user_id = $1 ORDER BY created_at DESC",
            SELECT_COLS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows.iter().map(row_to_payment).collect())
    }

    async fn record_paid(&self, input: &NewPayment) -> AppResult<Payment> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        // Conditional debit and payment insert commit or roll back together.
        let debited = sqlx::query(
            r#"
            UPDATE wallets SET
                balance_cents = balance_cents - $2,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND balance_cents >= $2
            "#,
        )
        .bind(input.wallet_id)
        .bind(input.amount_cents)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)?;

        if debited.rows_affected() == 0 {
            tx.rollback().await.map_err(AppError::from)?;
            let available: Option<i64> =
                sqlx::query_scalar("SELECT balance_cents FROM wallets WHERE id = $1")
                    .bind(input.wallet_id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(AppError::from)?;
            return match available {
                Some(available_cents) => Err(AppError::InsufficientFunds {
                    required_cents: input.amount_cents,
                    available_cents,
                }),
                None => Err(AppError::NotFound),
            };
        }

        let id = Uuid::new_v4();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO payments
                (id, user_id, wallet_id, service_id, plan_id, package_plan_id,
                 currency, amount_cents, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(id)
        .bind(input.user_id)
        .bind(input.wallet_id)
        .bind(input.service_id)
        .bind(input.plan_id)
        .bind(input.package_plan_id)
        .bind(&input.currency)
        .bind(input.amount_cents)
        .bind(PaymentStatus::Paid)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::from)?;

        tx.commit().await.map_err(AppError::from)?;
        Ok(row_to_payment(&row))
    }
}
