use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::extractors::{AuthUser, CurrentUser};
use crate::error::ApiError;
use crate::response::{ApiResponse, PageQuery, PaginatedResponse, Pagination};
use crate::state::AppState;
use crate::users::{
    dto::{
        AdminUpdateUserRequest, ProfileResponse, UpdateProfileRequest, UserDetail, UserSummary,
    },
    model::User,
    policy,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/user/profile", get(get_profile).put(update_profile))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route(
            "/users/:id",
            get(get_user).put(admin_update_user).delete(delete_user),
        )
}

#[instrument(skip_all)]
pub async fn get_profile(
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    Ok(Json(ApiResponse::ok(ProfileResponse::from(&user))))
}

#[instrument(skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    payload.validate()?;

    let user = User::update_profile(&state.db, user_id, &payload)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| {
            warn!(user_id = %user_id, "profile update for missing user");
            ApiError::Unauthorized("Invalid or expired token".into())
        })?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(ApiResponse::with_message(
        ProfileResponse::from(&user),
        "Profile updated successfully",
    )))
}

#[instrument(skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<UserSummary>>, ApiError> {
    policy::ensure(policy::is_admin(&actor))?;

    let (page, limit, offset) = query.clamped();
    let total = User::count(&state.db).await.map_err(ApiError::Internal)?;
    let users = User::list(&state.db, limit, offset)
        .await
        .map_err(ApiError::Internal)?;

    let data = users.iter().map(UserSummary::from).collect();
    Ok(Json(PaginatedResponse::new(
        data,
        Pagination::new(page, limit, total),
    )))
}

#[instrument(skip_all, fields(target = %id))]
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserDetail>>, ApiError> {
    policy::ensure(policy::can_view_user(&actor, id))?;

    let user = User::find_by_id(&state.db, id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(ApiResponse::ok(UserDetail::from(&user))))
}

#[instrument(skip_all, fields(target = %id))]
pub async fn admin_update_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<AdminUpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDetail>>, ApiError> {
    policy::ensure(policy::is_admin(&actor))?;
    payload.normalize();
    payload.validate()?;

    if payload.email.is_some() || payload.username.is_some() {
        let taken = User::identity_taken(
            &state.db,
            payload.email.as_deref(),
            payload.username.as_deref(),
            Some(id),
        )
        .await
        .map_err(ApiError::Internal)?;
        if taken {
            warn!(target = %id, "identity change collides with existing user");
            return Err(ApiError::Conflict("Email or username already in use".into()));
        }
    }

    let user = User::admin_update(&state.db, id, &payload)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    info!(target = %user.id, admin = %actor.id, "user updated by admin");
    Ok(Json(ApiResponse::with_message(
        UserDetail::from(&user),
        "User updated successfully",
    )))
}

#[instrument(skip_all, fields(target = %id))]
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    policy::ensure(policy::is_admin(&actor))?;

    let deleted = User::soft_delete(&state.db, id)
        .await
        .map_err(ApiError::Internal)?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".into()));
    }

    info!(target = %id, admin = %actor.id, "user soft-deleted");
    Ok(Json(ApiResponse::with_message(
        serde_json::Value::Null,
        "User deleted",
    )))
}
