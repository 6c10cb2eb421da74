use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::wallet_ledger::WalletRepo,
    domain::entities::wallet::Wallet,
};

fn row_to_wallet(row: &sqlx::postgres::PgRow) -> Wallet {
    Wallet {
        id: row.get("id"),
        user_id: row.get("user_id"),
        currency: row.get("currency"),
        balance_cents: row.get("balance_cents"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const SELECT_COLS: &str = "id, user_id, currency, balance_cents, created_at, updated_at";

#[async_trait]
impl WalletRepo for PostgresPersistence {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Wallet>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM wallets WHERE id = $1",
            SELECT_COLS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_wallet))
    }

    async fn get_by_user(&self, user_id: Uuid) -> AppResult<Option<Wallet>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM wallets WHERE user_id = $1",
            SELECT_COLS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_wallet))
    }

    async fn try_debit(&self, id: Uuid, amount_cents: i64) -> AppResult<Option<Wallet>> {
        // The balance condition inside the UPDATE is the race gate: two
        // concurrent debits serialize on the row lock and the second sees
        // the decremented balance.
        let row = sqlx::query(&format!(
            r#"
            UPDATE wallets SET
                balance_cents = balance_cents - $2,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND balance_cents >= $2
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(id)
        .bind(amount_cents)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_wallet))
    }

    async fn credit(&self, id: Uuid, amount_cents: i64) -> AppResult<Option<Wallet>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE wallets SET
                balance_cents = balance_cents + $2,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(id)
        .bind(amount_cents)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_wallet))
    }
}
