//! Authentication handlers: registration, login, and the OAuth flow.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use auth::{Claims, OAuthError, UserRole};

use crate::error::{is_unique_violation, ApiError, ApiResult};
use crate::state::AppState;
use crate::storage::{self, UserRecord};

/// User registration request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Username (3-32 characters, letters/digits/underscores).
    pub username: String,
    /// Password (min 8 characters).
    pub password: String,
    /// Email address (optional).
    #[serde(default)]
    pub email: Option<String>,
}

/// User login request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Authentication response with token and user info.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// JWT access token.
    pub token: String,
    /// User information.
    pub user: UserInfo,
}

/// User information.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfo {
    /// User ID.
    pub id: String,
    /// Username.
    pub username: String,
    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// User role ("user" or "admin").
    pub role: String,
    /// Account type ("regular" or "trader").
    pub user_type: String,
    /// Linked trader profile, for trader-linked accounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_trader_id: Option<String>,
    /// Profile bio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Profile image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for UserInfo {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            email: user.email,
            role: role_string(user.role).to_string(),
            user_type: user_type_string(user.user_type).to_string(),
            linked_trader_id: user.linked_trader_id.map(|id| id.to_string()),
            bio: user.bio,
            profile_image_url: user.profile_image_url,
            created_at: user.created_at,
        }
    }
}

pub(crate) fn role_string(role: i16) -> &'static str {
    match role {
        storage::ROLE_ADMIN => "admin",
        _ => "user",
    }
}

pub(crate) fn user_type_string(user_type: i16) -> &'static str {
    match user_type {
        storage::USER_TYPE_TRADER => "trader",
        _ => "regular",
    }
}

fn user_role(user: &UserRecord) -> UserRole {
    if user.is_admin() {
        UserRole::Admin
    } else {
        UserRole::User
    }
}

fn validate_username(username: &str) -> Result<(), ApiError> {
    if !(3..=32).contains(&username.len()) {
        return Err(ApiError::BadRequest(
            "Username must be between 3 and 32 characters".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ApiError::BadRequest(
            "Username may only contain letters, digits, and underscores".into(),
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < 8 {
        return Err(ApiError::BadRequest(
            "Password must be at least 8 characters".into(),
        ));
    }
    Ok(())
}

fn issue_token(state: &AppState, user: &UserRecord) -> Result<String, ApiError> {
    state
        .jwt_auth
        .create_token(&user.id.to_string(), &user.username, user_role(user))
        .map_err(|e| ApiError::Internal(format!("Token generation failed: {}", e)))
}

/// Register a new user account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Invalid request or username already taken"),
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    validate_username(&req.username)?;
    validate_password(&req.password)?;
    if let Some(ref email) = req.email {
        if !email.contains('@') || email.len() < 5 {
            return Err(ApiError::BadRequest("Invalid email address".into()));
        }
    }

    let password_hash = auth::hash_password(&req.password)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

    let user = match storage::insert_local_user(
        &state.pool,
        &req.username,
        req.email.as_deref(),
        &password_hash,
    )
    .await
    {
        Ok(user) => user,
        // A taken username is a validation failure, not a conflict, on this endpoint.
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::BadRequest("Username already taken".into()));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    let token = issue_token(&state, &user)?;
    let response = AuthResponse {
        token,
        user: user.into(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with username and password.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = storage::find_user_by_username(&state.pool, &req.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".into()))?;

    // External-auth accounts have no password hash and cannot log in locally.
    let stored_hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".into()))?;

    if !auth::verify_password(&req.password, stored_hash) {
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    let _ = storage::touch_last_login(&state.pool, user.id).await;

    let token = issue_token(&state, &user)?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Logout response.
#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Log out.
///
/// Tokens are stateless; this endpoint exists for wire compatibility and
/// always succeeds. Clients drop the token.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = LogoutResponse),
    ),
    tag = "auth"
)]
pub async fn logout() -> Json<LogoutResponse> {
    Json(LogoutResponse { success: true })
}

/// Get the current authenticated user's information.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user info", body = UserInfo),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<UserInfo>> {
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::Internal("Invalid user ID in token".into()))?;

    let user = storage::find_user_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

    Ok(Json(user.into()))
}

/// Admin status response.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminStatusResponse {
    pub is_admin: bool,
}

/// Check whether the current user is an administrator.
///
/// The role is read from the store, not from the token.
#[utoipa::path(
    get,
    path = "/api/auth/admin-status",
    responses(
        (status = 200, description = "Admin status", body = AdminStatusResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn admin_status(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<AdminStatusResponse>> {
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::Internal("Invalid user ID in token".into()))?;

    let user = storage::find_user_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

    Ok(Json(AdminStatusResponse {
        is_admin: user.is_admin(),
    }))
}

/// OAuth login response: the provider URL to redirect the browser to.
#[derive(Debug, Serialize, ToSchema)]
pub struct OAuthLoginResponse {
    pub url: String,
}

/// Begin the OAuth flow.
#[utoipa::path(
    get,
    path = "/api/auth/oauth/login",
    responses(
        (status = 200, description = "Provider redirect URL", body = OAuthLoginResponse),
        (status = 503, description = "OAuth is not configured"),
    ),
    tag = "auth"
)]
pub async fn oauth_login(State(state): State<Arc<AppState>>) -> ApiResult<Json<OAuthLoginResponse>> {
    let oauth = state
        .oauth
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("OAuth is not configured".into()))?;

    let csrf_state = Uuid::new_v4().to_string();
    Ok(Json(OAuthLoginResponse {
        url: oauth.authorize_url(&csrf_state),
    }))
}

/// Query parameters of the OAuth callback.
#[derive(Debug, Deserialize, IntoParams)]
pub struct OAuthCallbackQuery {
    /// Authorization code from the provider.
    pub code: String,
    /// Opaque state echoed by the provider.
    #[allow(dead_code)]
    pub state: Option<String>,
}

/// Complete the OAuth flow: exchange the code, resolve the identity, and
/// issue the same JWT a local login would.
#[utoipa::path(
    get,
    path = "/api/auth/oauth/callback",
    params(OAuthCallbackQuery),
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Provider rejected the sign-in"),
        (status = 503, description = "OAuth is not configured or provider unreachable"),
    ),
    tag = "auth"
)]
pub async fn oauth_callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OAuthCallbackQuery>,
) -> ApiResult<Json<AuthResponse>> {
    let oauth = state
        .oauth
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("OAuth is not configured".into()))?;

    let identity = async {
        let access_token = oauth.exchange_code(&query.code).await?;
        oauth.fetch_identity(&access_token).await
    }
    .await
    .map_err(|e| match &e {
        OAuthError::Http(err) => {
            tracing::warn!(error = %err, "OAuth provider unreachable");
            ApiError::ServiceUnavailable("OAuth provider unreachable".into())
        }
        OAuthError::Provider(_) | OAuthError::MissingField(_) => {
            tracing::warn!(error = %e, "OAuth sign-in rejected");
            ApiError::Unauthorized("OAuth sign-in failed".into())
        }
    })?;

    let user = match storage::find_user_by_oauth_subject(&state.pool, &identity.subject).await? {
        Some(user) => user,
        None => create_oauth_user(&state, &identity).await?,
    };

    let _ = storage::touch_last_login(&state.pool, user.id).await;

    let token = issue_token(&state, &user)?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// First external-auth login: create an account with a free username.
async fn create_oauth_user(
    state: &AppState,
    identity: &auth::OAuthIdentity,
) -> Result<UserRecord, ApiError> {
    let base = identity
        .username
        .as_deref()
        .map(sanitize_username)
        .filter(|name| name.len() >= 3)
        .unwrap_or_else(|| "kol_user".to_string());

    let mut candidate = base.clone();
    for _ in 0..4 {
        match storage::insert_oauth_user(
            &state.pool,
            &candidate,
            identity.email.as_deref(),
            &identity.subject,
            identity.avatar_url.as_deref(),
        )
        .await
        {
            Ok(user) => {
                tracing::info!(user_id = %user.id, username = %user.username, "OAuth user created");
                return Ok(user);
            }
            Err(e) if is_unique_violation(&e) => {
                // Username taken; retry with a random suffix.
                let suffix = Uuid::new_v4().simple().to_string();
                candidate = format!("{}_{}", &base[..base.len().min(25)], &suffix[..6]);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(ApiError::Internal(
        "Could not allocate a username for the new account".into(),
    ))
}

fn sanitize_username(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_validation() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("al_1ce").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(33)).is_err());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username("nope!").is_err());
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_sanitize_username() {
        assert_eq!(sanitize_username("alice"), "alice");
        assert_eq!(sanitize_username("alice w."), "alice_w_");
        assert_eq!(sanitize_username(&"x".repeat(40)).len(), 32);
    }

    #[test]
    fn test_role_strings() {
        assert_eq!(role_string(storage::ROLE_ADMIN), "admin");
        assert_eq!(role_string(storage::ROLE_USER), "user");
        assert_eq!(role_string(42), "user");
        assert_eq!(user_type_string(storage::USER_TYPE_TRADER), "trader");
        assert_eq!(user_type_string(storage::USER_TYPE_REGULAR), "regular");
    }
}
