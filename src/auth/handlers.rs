use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::{
    dto::{AuthResponse, LoginRequest, RegisterRequest},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::users::{dto::UserSummary, model::User};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    payload.normalize();
    payload.validate()?;

    let taken = User::identity_taken(
        &state.db,
        Some(&payload.email),
        Some(&payload.username),
        None,
    )
    .await
    .map_err(ApiError::Internal)?;
    if taken {
        warn!(email = %payload.email, "registration conflict");
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let hash = hash_password(&payload.password).map_err(ApiError::Internal)?;

    let user = User::create(
        &state.db,
        Uuid::new_v4(),
        &payload.email,
        &payload.username,
        &hash,
        payload.full_name.as_deref(),
    )
    .await
    .map_err(ApiError::Internal)?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id).map_err(ApiError::Internal)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            AuthResponse {
                user: UserSummary::from(&user),
                token,
            },
            "User registered successfully",
        )),
    ))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    payload.normalize();
    payload.validate()?;

    let user = User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::Unauthorized("Invalid credentials".into())
        })?;

    let ok = verify_password(&payload.password, &user.password_hash)
        .map_err(ApiError::Internal)?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    User::touch_last_login(&state.db, user.id)
        .await
        .map_err(ApiError::Internal)?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id).map_err(ApiError::Internal)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(ApiResponse::with_message(
        AuthResponse {
            user: UserSummary::from(&user),
            token,
        },
        "Login successful",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    #[test]
    fn auth_response_serialization_hides_nothing_sensitive() {
        let user = User {
            id: Uuid::new_v4(),
            email: "test@example.com".into(),
            username: "tester".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            role: crate::users::model::Role::User,
            email_verified: false,
            full_name: None,
            avatar_url: None,
            bio: None,
            quota_text_tokens: 1000,
            quota_images: 10,
            quota_videos: 1,
            quota_audio_minutes: 5,
            settings: serde_json::json!({}),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
            last_login_at: None,
            deleted_at: None,
        };
        let response = AuthResponse {
            user: UserSummary::from(&user),
            token: "abc.def.ghi".into(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("abc.def.ghi"));
        assert!(!json.contains("argon2id"));
    }
}
