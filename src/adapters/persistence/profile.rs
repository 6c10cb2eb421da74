use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::profiles::{ProfileRepo, ServiceAccountRepo},
    domain::entities::{
        profile::{Profile, ProfileStatus},
        service::ServiceAccount,
    },
};

fn row_to_profile(row: &sqlx::postgres::PgRow) -> Profile {
    Profile {
        id: row.get("id"),
        user_id: row.get("user_id"),
        service_id: row.get("service_id"),
        account_id: row.get("account_id"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const SELECT_COLS: &str = "id, user_id, service_id, account_id, status, created_at, updated_at";

#[async_trait]
impl ProfileRepo for PostgresPersistence {
    async fn get_active(&self, user_id: Uuid, service_id: Uuid) -> AppResult<Option<Profile>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM profiles WHERE user_id = $1 AND service_id = $2 AND status = 'active'",
            SELECT_COLS
        ))
        .bind(user_id)
        .bind(service_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_profile))
    }

    async fn get_inactive(&self, user_id: Uuid, service_id: Uuid) -> AppResult<Option<Profile>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {} FROM profiles
            WHERE user_id = $1 AND service_id = $2 AND status = 'inactive'
            ORDER BY updated_at DESC
            LIMIT 1
            "#,
            SELECT_COLS
        ))
        .bind(user_id)
        .bind(service_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_profile))
    }

    async fn try_activate(&self, profile_id: Uuid) -> AppResult<Option<Profile>> {
        // Guarded flip; a concurrent activation of the same row leaves
        // exactly one winner.
        let row = sqlx::query(&format!(
            r#"
            UPDATE profiles SET
                status = 'active',
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND status = 'inactive'
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_profile))
    }

    async fn create_active(
        &self,
        user_id: Uuid,
        service_id: Uuid,
        account_id: Uuid,
    ) -> AppResult<Profile> {
        let id = Uuid::new_v4();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO profiles (id, user_id, service_id, account_id, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(id)
        .bind(user_id)
        .bind(service_id)
        .bind(account_id)
        .bind(ProfileStatus::Active)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row_to_profile(&row))
    }

    async fn deactivate_all(&self, user_id: Uuid, service_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE profiles SET
                status = 'inactive',
                updated_at = CURRENT_TIMESTAMP
            WHERE user_id = $1 AND service_id = $2 AND status = 'active'
            "#,
        )
        .bind(user_id)
        .bind(service_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl ServiceAccountRepo for PostgresPersistence {
    async fn find_with_capacity(&self, service_id: Uuid) -> AppResult<Option<ServiceAccount>> {
        let row = sqlx::query(
            r#"
            SELECT a.id, a.service_id, a.label, a.max_profiles, a.created_at
            FROM service_accounts a
            WHERE a.service_id = $1
              AND (SELECT COUNT(*) FROM profiles p
                   WHERE p.account_id = a.id AND p.status = 'active') < a.max_profiles
            ORDER BY a.created_at ASC
            LIMIT 1
            "#,
        )
        .bind(service_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.map(|row| ServiceAccount {
            id: row.get("id"),
            service_id: row.get("service_id"),
            label: row.get("label"),
            max_profiles: row.get("max_profiles"),
            created_at: row.get("created_at"),
        }))
    }
}
