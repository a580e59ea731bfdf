use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::users::dto::{AdminUpdateUserRequest, UpdateProfileRequest};
use crate::users::model::User;

const USER_COLUMNS: &str = "id, email, username, password_hash, role, email_verified, \
     full_name, avatar_url, bio, quota_text_tokens, quota_images, quota_videos, \
     quota_audio_minutes, settings, created_at, updated_at, last_login_at, deleted_at";

impl User {
    /// Find a non-deleted user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a non-deleted user by id.
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// True if the email or username is already held by another non-deleted
    /// row. `exclude` skips the given id (for admin identity changes).
    pub async fn identity_taken(
        db: &PgPool,
        email: Option<&str>,
        username: Option<&str>,
        exclude: Option<Uuid>,
    ) -> anyhow::Result<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE (email = $1 OR username = $2)
                  AND deleted_at IS NULL
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(email)
        .bind(username)
        .bind(exclude)
        .fetch_one(db)
        .await?;
        Ok(taken)
    }

    /// Create a new user with hashed password.
    pub async fn create(
        db: &PgPool,
        id: Uuid,
        email: &str,
        username: &str,
        password_hash: &str,
        full_name: Option<&str>,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, email, username, password_hash, full_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .bind(full_name)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn touch_last_login(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET last_login_at = now() WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Update only the supplied profile fields plus `updated_at`, returning
    /// the post-update row. None if the user is gone or deleted. At least
    /// one field must be supplied.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        changes: &UpdateProfileRequest,
    ) -> anyhow::Result<Option<User>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        {
            let mut parts = qb.separated(", ");
            if let Some(full_name) = &changes.full_name {
                parts.push("full_name = ");
                parts.push_bind_unseparated(full_name.clone());
            }
            if let Some(avatar_url) = &changes.avatar_url {
                parts.push("avatar_url = ");
                parts.push_bind_unseparated(avatar_url.clone());
            }
            if let Some(bio) = &changes.bio {
                parts.push("bio = ");
                parts.push_bind_unseparated(bio.clone());
            }
            if let Some(settings) = &changes.settings {
                parts.push("settings = ");
                parts.push_bind_unseparated(settings.clone());
            }
        }
        qb.push(", updated_at = now() WHERE id = ");
        qb.push_bind(id);
        qb.push(" AND deleted_at IS NULL RETURNING ");
        qb.push(USER_COLUMNS);

        let user = qb.build_query_as::<User>().fetch_optional(db).await?;
        Ok(user)
    }

    /// Admin-side partial update (identity, role, verification, quotas).
    /// At least one field must be supplied.
    pub async fn admin_update(
        db: &PgPool,
        id: Uuid,
        changes: &AdminUpdateUserRequest,
    ) -> anyhow::Result<Option<User>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        {
            let mut parts = qb.separated(", ");
            if let Some(email) = &changes.email {
                parts.push("email = ");
                parts.push_bind_unseparated(email.clone());
            }
            if let Some(username) = &changes.username {
                parts.push("username = ");
                parts.push_bind_unseparated(username.clone());
            }
            if let Some(role) = changes.role {
                parts.push("role = ");
                parts.push_bind_unseparated(role);
            }
            if let Some(email_verified) = changes.email_verified {
                parts.push("email_verified = ");
                parts.push_bind_unseparated(email_verified);
            }
            if let Some(quota) = changes.quota_text_tokens {
                parts.push("quota_text_tokens = ");
                parts.push_bind_unseparated(quota);
            }
            if let Some(quota) = changes.quota_images {
                parts.push("quota_images = ");
                parts.push_bind_unseparated(quota);
            }
            if let Some(quota) = changes.quota_videos {
                parts.push("quota_videos = ");
                parts.push_bind_unseparated(quota);
            }
            if let Some(quota) = changes.quota_audio_minutes {
                parts.push("quota_audio_minutes = ");
                parts.push_bind_unseparated(quota);
            }
        }
        qb.push(", updated_at = now() WHERE id = ");
        qb.push_bind(id);
        qb.push(" AND deleted_at IS NULL RETURNING ");
        qb.push(USER_COLUMNS);

        let user = qb.build_query_as::<User>().fetch_optional(db).await?;
        Ok(user)
    }

    /// Soft delete. Returns false if the row was already deleted or absent.
    pub async fn soft_delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result =
            sqlx::query("UPDATE users SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(db)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Non-deleted users, newest first.
    pub async fn list(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE deleted_at IS NULL
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
            "SELECT COUNT(*) FROM users WHERE deleted_at IS NULL",
        )
        .fetch_one(db)
        .await?;
        Ok(total)
    }
}
