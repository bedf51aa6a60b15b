//! Profile image upload handler.
//!
//! Files land under the configured upload directory and are served back by
//! the static file service mounted at `/uploads`.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Maximum accepted image size in bytes.
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Upload response carrying the public URL of the stored file.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// URL path the uploaded image is served from.
    pub url: String,
}

fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Upload a profile image (authenticated).
#[utoipa::path(
    post,
    path = "/api/upload/profile-image",
    tag = "uploads",
    responses(
        (status = 201, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Missing, oversized, or non-image file"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_profile_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field
            .content_type()
            .ok_or_else(|| ApiError::BadRequest("Missing image content type".into()))?;
        let extension = extension_for_content_type(content_type).ok_or_else(|| {
            ApiError::BadRequest("Only PNG, JPEG, and WebP images are accepted".into())
        })?;

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {e}")))?;
        if data.is_empty() {
            return Err(ApiError::BadRequest("Uploaded image is empty".into()));
        }
        if data.len() > MAX_IMAGE_BYTES {
            return Err(ApiError::BadRequest("Image exceeds the 5 MB limit".into()));
        }

        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        let path = state.upload_dir.join(&filename);

        tokio::fs::create_dir_all(&state.upload_dir)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to create upload dir: {e}")))?;
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to store image: {e}")))?;

        tracing::info!(file = %filename, bytes = data.len(), "Profile image stored");

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                url: format!("/uploads/{filename}"),
            }),
        ));
    }

    Err(ApiError::BadRequest(
        "Expected a multipart field named 'image'".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_mapping() {
        assert_eq!(extension_for_content_type("image/png"), Some("png"));
        assert_eq!(extension_for_content_type("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for_content_type("image/webp"), Some("webp"));
        assert_eq!(extension_for_content_type("image/gif"), None);
        assert_eq!(extension_for_content_type("text/html"), None);
    }
}
