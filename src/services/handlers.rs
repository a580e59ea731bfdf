use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::{AuthUser, CurrentUser};
use crate::error::ApiError;
use crate::response::{ApiResponse, PageQuery, PaginatedResponse, Pagination};
use crate::services::{
    dto::{CreateServiceRequest, ServiceResponse, UpdateServiceRequest},
    model::Service,
};
use crate::state::AppState;
use crate::users::policy;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services).post(create_service))
        .route(
            "/services/:id",
            get(get_service).put(update_service).delete(delete_service),
        )
}

#[instrument(skip_all)]
pub async fn list_services(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<ServiceResponse>>, ApiError> {
    let (page, limit, offset) = query.clamped();
    let total = Service::count(&state.db).await.map_err(ApiError::Internal)?;
    let services = Service::list(&state.db, limit, offset)
        .await
        .map_err(ApiError::Internal)?;

    let data = services.iter().map(ServiceResponse::from).collect();
    Ok(Json(PaginatedResponse::new(
        data,
        Pagination::new(page, limit, total),
    )))
}

#[instrument(skip_all, fields(service = %id))]
pub async fn get_service(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ServiceResponse>>, ApiError> {
    let service = Service::find_by_id(&state.db, id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Service not found".into()))?;

    Ok(Json(ApiResponse::ok(ServiceResponse::from(&service))))
}

#[instrument(skip_all)]
pub async fn create_service(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ServiceResponse>>), ApiError> {
    payload.validate()?;

    let service = Service::create(&state.db, Uuid::new_v4(), actor.id, &payload)
        .await
        .map_err(ApiError::Internal)?;

    info!(service = %service.id, owner = %actor.id, "service created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            ServiceResponse::from(&service),
            "Service created successfully",
        )),
    ))
}

#[instrument(skip_all, fields(service = %id))]
pub async fn update_service(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateServiceRequest>,
) -> Result<Json<ApiResponse<ServiceResponse>>, ApiError> {
    payload.validate()?;

    let existing = Service::find_by_id(&state.db, id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Service not found".into()))?;
    policy::ensure(policy::can_manage_service(&actor, existing.owner_id))?;

    let service = Service::update(&state.db, id, &payload)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Service not found".into()))?;

    info!(service = %service.id, actor = %actor.id, "service updated");
    Ok(Json(ApiResponse::with_message(
        ServiceResponse::from(&service),
        "Service updated successfully",
    )))
}

#[instrument(skip_all, fields(service = %id))]
pub async fn delete_service(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let existing = Service::find_by_id(&state.db, id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Service not found".into()))?;
    policy::ensure(policy::can_manage_service(&actor, existing.owner_id))?;

    let deleted = Service::soft_delete(&state.db, id)
        .await
        .map_err(ApiError::Internal)?;
    if !deleted {
        return Err(ApiError::NotFound("Service not found".into()));
    }

    info!(service = %id, actor = %actor.id, "service soft-deleted");
    Ok(Json(ApiResponse::with_message(
        serde_json::Value::Null,
        "Service deleted",
    )))
}
