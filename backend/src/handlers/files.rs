//! File upload endpoint and download disposition for served files

use axum::{
    extract::{Multipart, Request, State},
    http::{header::CONTENT_DISPOSITION, HeaderValue},
    middleware::Next,
    response::Response,
    Json,
};

use crate::error::{AppError, AppResult};
use crate::services::storage::{attachment_disposition, DOWNLOAD_QUERY};
use crate::services::StoredBlob;
use crate::AppState;

/// Store the multipart `file` field and return its public location
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<StoredBlob>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::ValidationError(format!("Failed to read upload: {}", e)))?;

        let blob = state
            .blobs
            .put(&file_name, content_type.as_deref(), &data)
            .await?;
        return Ok(Json(blob));
    }

    Err(AppError::validation("file", "No file provided"))
}

/// Mark successful `?download=1` file responses as attachments
pub async fn download_disposition(request: Request, next: Next) -> Response {
    let wants_download = request
        .uri()
        .query()
        .is_some_and(|query| query.split('&').any(|pair| pair == DOWNLOAD_QUERY));
    let file_name = request
        .uri()
        .path()
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string();

    let mut response = next.run(request).await;
    if wants_download && response.status().is_success() && !file_name.is_empty() {
        if let Ok(value) = HeaderValue::from_str(&attachment_disposition(&file_name)) {
            response.headers_mut().insert(CONTENT_DISPOSITION, value);
        }
    }
    response
}
