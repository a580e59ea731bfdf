use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
};
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// Content type by file extension, for objects stored without one.
fn content_type_for(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or_default();
    match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "txt" => "text/plain; charset=utf-8",
        "pdf" => "application/pdf",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

/// Fingerprinted build artifacts get an immutable cache policy.
fn cache_control_for(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or_default();
    match ext.to_ascii_lowercase().as_str() {
        "css" | "js" | "mjs" | "png" | "jpg" | "jpeg" | "gif" | "svg" | "ico" | "webp"
        | "woff" | "woff2" | "ttf" => "public, max-age=31536000, immutable",
        _ => "public, max-age=3600",
    }
}

#[instrument(skip(state))]
pub async fn serve_asset(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if path.split('/').any(|segment| segment == "..") {
        return Err(ApiError::NotFound("Asset not found".into()));
    }

    let object = state
        .storage
        .get_object(&path)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Asset not found".into()))?;

    let content_type = object
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
        .unwrap_or_else(|| HeaderValue::from_static(content_type_for(&path)));

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control_for(&path)),
    );
    if let Some(etag) = object.etag.as_deref().and_then(|t| HeaderValue::from_str(t).ok()) {
        headers.insert(header::ETAG, etag);
    }

    Ok((headers, object.body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type_for("index.html"), "text/html; charset=utf-8");
        assert_eq!(content_type_for("app/bundle.JS"), "application/javascript; charset=utf-8");
        assert_eq!(content_type_for("logo.svg"), "image/svg+xml");
        assert_eq!(content_type_for("archive.bin"), "application/octet-stream");
        assert_eq!(content_type_for("noextension"), "application/octet-stream");
    }

    #[test]
    fn fingerprinted_assets_cache_forever() {
        assert_eq!(
            cache_control_for("assets/app.3f9a.js"),
            "public, max-age=31536000, immutable"
        );
        assert_eq!(cache_control_for("index.html"), "public, max-age=3600");
    }

    #[tokio::test]
    async fn missing_asset_is_not_found() {
        let state = AppState::fake();
        let result = serve_asset(State(state), Path("missing.png".into())).await;
        assert!(matches!(result.err(), Some(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn parent_traversal_is_rejected() {
        let state = AppState::fake();
        let result = serve_asset(State(state), Path("../secrets".into())).await;
        assert!(matches!(result.err(), Some(ApiError::NotFound(_))));
    }
}
