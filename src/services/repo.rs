use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::services::dto::{CreateServiceRequest, UpdateServiceRequest};
use crate::services::model::Service;

const SERVICE_COLUMNS: &str =
    "id, owner_id, name, description, category, tags, config, status, created_at, updated_at";

impl Service {
    /// Non-deleted services, newest first.
    pub async fn list(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<Service>> {
        let rows = sqlx::query_as::<_, Service>(&format!(
            r#"
            SELECT {SERVICE_COLUMNS} FROM services
            WHERE status <> 'deleted'
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn count(db: &PgPool) -> anyhow::Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM services WHERE status <> 'deleted'",
        )
        .fetch_one(db)
        .await?;
        Ok(total)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Service>> {
        let service = sqlx::query_as::<_, Service>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1 AND status <> 'deleted'"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(service)
    }

    pub async fn create(
        db: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        request: &CreateServiceRequest,
    ) -> anyhow::Result<Service> {
        let service = sqlx::query_as::<_, Service>(&format!(
            r#"
            INSERT INTO services (id, owner_id, name, description, category, tags, config)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {SERVICE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.category)
        .bind(&request.tags)
        .bind(request.config.clone().unwrap_or_else(|| serde_json::json!({})))
        .fetch_one(db)
        .await?;
        Ok(service)
    }

    /// Update only the supplied fields plus `updated_at`. At least one field
    /// must be supplied. None if the service is gone or deleted.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        changes: &UpdateServiceRequest,
    ) -> anyhow::Result<Option<Service>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE services SET ");
        {
            let mut parts = qb.separated(", ");
            if let Some(name) = &changes.name {
                parts.push("name = ");
                parts.push_bind_unseparated(name.clone());
            }
            if let Some(description) = &changes.description {
                parts.push("description = ");
                parts.push_bind_unseparated(description.clone());
            }
            if let Some(category) = &changes.category {
                parts.push("category = ");
                parts.push_bind_unseparated(category.clone());
            }
            if let Some(tags) = &changes.tags {
                parts.push("tags = ");
                parts.push_bind_unseparated(tags.clone());
            }
            if let Some(config) = &changes.config {
                parts.push("config = ");
                parts.push_bind_unseparated(config.clone());
            }
            if let Some(status) = changes.status {
                parts.push("status = ");
                parts.push_bind_unseparated(status);
            }
        }
        qb.push(", updated_at = now() WHERE id = ");
        qb.push_bind(id);
        qb.push(" AND status <> 'deleted' RETURNING ");
        qb.push(SERVICE_COLUMNS);

        let service = qb.build_query_as::<Service>().fetch_optional(db).await?;
        Ok(service)
    }

    /// Soft delete via status. Returns false if already deleted or absent.
    pub async fn soft_delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE services SET status = 'deleted', updated_at = now() \
             WHERE id = $1 AND status <> 'deleted'",
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
