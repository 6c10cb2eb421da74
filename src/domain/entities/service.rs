use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A resold third-party service (streaming, storage, ...).
#[derive(Debug, Clone, Serialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Shared pooled credential from which seats are carved. `max_profiles`
/// bounds the number of concurrently ACTIVE profiles on the account.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceAccount {
    pub id: Uuid,
    pub service_id: Uuid,
    pub label: String,
    pub max_profiles: i32,
    pub created_at: Option<DateTime<Utc>>,
}

/// A set of services sold together under one package plan.
#[derive(Debug, Clone, Serialize)]
pub struct ServicePackage {
    pub id: Uuid,
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
}
