use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::{profile::Profile, service::ServiceAccount},
};

#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn get_active(&self, user_id: Uuid, service_id: Uuid) -> AppResult<Option<Profile>>;
    async fn get_inactive(&self, user_id: Uuid, service_id: Uuid) -> AppResult<Option<Profile>>;
    /// Flips one INACTIVE profile to ACTIVE. `None` when the row was no
    /// longer INACTIVE (lost race); never overwrites an ACTIVE row.
    async fn try_activate(&self, profile_id: Uuid) -> AppResult<Option<Profile>>;
    async fn create_active(
        &self,
        user_id: Uuid,
        service_id: Uuid,
        account_id: Uuid,
    ) -> AppResult<Profile>;
    /// Flips all ACTIVE profiles for (user, service) to INACTIVE; returns
    /// how many were flipped.
    async fn deactivate_all(&self, user_id: Uuid, service_id: Uuid) -> AppResult<u64>;
}

#[async_trait]
pub trait ServiceAccountRepo: Send + Sync {
    /// Picks a shared account for the service that still has a free seat.
    async fn find_with_capacity(&self, service_id: Uuid) -> AppResult<Option<ServiceAccount>>;
}

/// Assigns and reclaims seats on shared service accounts.
pub struct ProfileActivator {
    profile_repo: Arc<dyn ProfileRepo>,
    account_repo: Arc<dyn ServiceAccountRepo>,
}

impl ProfileActivator {
    pub fn new(
        profile_repo: Arc<dyn ProfileRepo>,
        account_repo: Arc<dyn ServiceAccountRepo>,
    ) -> Self {
        Self {
            profile_repo,
            account_repo,
        }
    }

    /// Idempotent seat assignment: an existing ACTIVE seat is returned as
    /// is, a dormant one is re-activated, and only then is a new seat
    /// carved from an account with free capacity.
    pub async fn activate(&self, user_id: Uuid, service_id: Uuid) -> AppResult<Profile> {
        if let Some(existing) = self.profile_repo.get_active(user_id, service_id).await? {
            return Ok(existing);
        }

        if let Some(dormant) = self.profile_repo.get_inactive(user_id, service_id).await? {
            if let Some(profile) = self.profile_repo.try_activate(dormant.id).await? {
                return Ok(profile);
            }
            // Lost the flip race; whatever is ACTIVE now is our seat.
            if let Some(existing) = self.profile_repo.get_active(user_id, service_id).await? {
                return Ok(existing);
            }
        }

        let account = self
            .account_repo
            .find_with_capacity(service_id)
            .await?
            .ok_or(AppError::NoAvailableAccount { service_id })?;
        self.profile_repo
            .create_active(user_id, service_id, account.id)
            .await
    }

    /// Idempotent seat reclaim; a no-op when nothing is ACTIVE.
    pub async fn deactivate(&self, user_id: Uuid, service_id: Uuid) -> AppResult<()> {
        let flipped = self.profile_repo.deactivate_all(user_id, service_id).await?;
        if flipped > 0 {
            tracing::debug!(
                user_id = %user_id,
                service_id = %service_id,
                count = flipped,
                "Deactivated profiles"
            );
        }
        Ok(())
    }

    /// Best-effort seat assignment across a bundle. Per-service failures
    /// are logged and collected, not fatal; only a fully failed non-empty
    /// bundle errors.
    pub async fn activate_bundle(
        &self,
        user_id: Uuid,
        service_ids: &[Uuid],
    ) -> AppResult<Vec<Profile>> {
        let mut activated = Vec::with_capacity(service_ids.len());
        for &service_id in service_ids {
            match self.activate(user_id, service_id).await {
                Ok(profile) => activated.push(profile),
                Err(e) => {
                    tracing::warn!(
                        user_id = %user_id,
                        service_id = %service_id,
                        error = %e,
                        "Bundle seat activation failed"
                    );
                }
            }
        }
        if activated.is_empty() && !service_ids.is_empty() {
            return Err(AppError::BundleActivationFailed);
        }
        Ok(activated)
    }
}
