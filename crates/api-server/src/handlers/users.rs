//! User profile and admin user-management handlers.

use axum::extract::{Path, State};
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use auth::Claims;

use crate::error::{ApiError, ApiResult};
use crate::handlers::auth::{role_string, user_type_string, UserInfo};
use crate::handlers::traders::DeleteResponse;
use crate::state::AppState;
use crate::storage;

/// Request to update the current user's profile.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    /// New bio.
    #[serde(default)]
    pub bio: Option<String>,
    /// New profile image URL (typically from the upload endpoint).
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// User list item for the admin view.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserListItem {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: String,
    pub user_type: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

/// Update the current user's profile.
#[utoipa::path(
    put,
    path = "/api/users/me",
    tag = "users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserInfo),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserInfo>> {
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::Internal("Invalid user ID in token".into()))?;

    if let Some(ref bio) = req.bio {
        if bio.len() > 1000 {
            return Err(ApiError::BadRequest(
                "Bio must be at most 1000 characters".into(),
            ));
        }
    }

    let user = storage::update_user_profile(
        &state.pool,
        user_id,
        req.bio.as_deref(),
        req.profile_image_url.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

    Ok(Json(user.into()))
}

/// List all users (admin only).
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = Vec<UserListItem>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<UserListItem>>> {
    let users = storage::list_users(&state.pool).await?;

    let items = users
        .into_iter()
        .map(|u| UserListItem {
            id: u.id.to_string(),
            username: u.username,
            email: u.email,
            role: role_string(u.role).to_string(),
            user_type: user_type_string(u.user_type).to_string(),
            created_at: u.created_at,
            last_login: u.last_login,
        })
        .collect();

    Ok(Json(items))
}

/// Delete a user and all their ratings, votes, and badges (admin only).
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = DeleteResponse),
        (status = 400, description = "Cannot delete own account"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    if claims.sub == id.to_string() {
        return Err(ApiError::BadRequest(
            "Cannot delete your own account".into(),
        ));
    }

    let deleted = storage::delete_user_cascade(&state.pool, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".into()));
    }

    tracing::info!(user_id = %id, "User deleted with ratings, votes, and badges");
    Ok(Json(DeleteResponse { success: true }))
}
