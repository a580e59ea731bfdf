use axum::{extract::State, Json};
use serde::Serialize;
use std::time::Instant;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::time::{timeout, Duration};
use tracing::{instrument, warn};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Serialize)]
pub struct DependencyHealth {
    pub database: &'static str,
    pub storage: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: String,
    pub environment: String,
    pub version: &'static str,
    pub services: DependencyHealth,
    pub response_time_ms: u128,
}

fn label(healthy: bool) -> &'static str {
    if healthy {
        "healthy"
    } else {
        "unhealthy"
    }
}

/// Probes the database and object storage. An unreachable database makes the
/// whole service report 503; a storage failure is surfaced but not fatal.
#[instrument(skip_all)]
pub async fn health(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<HealthStatus>>, ApiError> {
    let started = Instant::now();

    let db_ok = matches!(
        timeout(PROBE_TIMEOUT, sqlx::query("SELECT 1").execute(&state.db)).await,
        Ok(Ok(_))
    );
    if !db_ok {
        warn!("database health probe failed");
        return Err(ApiError::Unavailable("Database unavailable".into()));
    }

    let storage_ok = matches!(
        timeout(PROBE_TIMEOUT, state.storage.check()).await,
        Ok(Ok(()))
    );
    if !storage_ok {
        warn!("storage health probe failed");
    }

    let body = HealthStatus {
        status: "healthy",
        timestamp: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default(),
        environment: state.config.environment.clone(),
        version: env!("CARGO_PKG_VERSION"),
        services: DependencyHealth {
            database: label(db_ok),
            storage: label(storage_ok),
        },
        response_time_ms: started.elapsed().as_millis(),
    };

    Ok(Json(ApiResponse::ok(body)))
}
