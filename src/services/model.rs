use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "service_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Pending,
    Active,
    Suspended,
    Deleted,
}

/// Catalog entry owned by a user. Soft-deleted by moving to
/// `ServiceStatus::Deleted`; queries must exclude that status.
#[derive(Debug, Clone, FromRow)]
pub struct Service {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub config: serde_json::Value,
    pub status: ServiceStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
