//! Authentication middleware and extractors for API routes.
//!
//! Identity is request-scoped: `require_auth` validates the bearer token
//! and injects [`Claims`] into request extensions; nothing is read from
//! ambient state. Admin checks re-read the role from the store on every
//! privileged call rather than trusting the token's role claim.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, header::AUTHORIZATION, request::Parts, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::convert::Infallible;
use std::sync::Arc;
use uuid::Uuid;

use auth::Claims;

use crate::error::ErrorResponse;
use crate::state::AppState;
use crate::storage;

/// Extract and validate the JWT from an Authorization header.
fn claims_from_headers(state: &AppState, headers: &axum::http::HeaderMap) -> Option<Claims> {
    let auth_header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = auth_header.strip_prefix("Bearer ")?;
    match state.jwt_auth.validate_token(token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!(error = %e, "Token validation failed");
            None
        }
    }
}

/// Extract and validate JWT token from Authorization header.
/// On success, injects `Claims` into request extensions for use by handlers.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let claims = match claims_from_headers(&state, request.headers()) {
        Some(claims) => claims,
        None => return unauthorized_response("Authentication required"),
    };

    tracing::debug!(user_id = %claims.sub, role = ?claims.role, "Authenticated request");
    request.extensions_mut().insert(claims);

    next.run(request).await
}

/// Middleware that requires admin role.
/// Must be applied AFTER `require_auth` middleware.
///
/// The role is re-checked against the store on every call; a token minted
/// before a demotion does not retain admin access.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let claims = match request.extensions().get::<Claims>() {
        Some(c) => c,
        None => {
            // This shouldn't happen if require_auth runs first
            return unauthorized_response("Not authenticated");
        }
    };

    let user_id = match Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => return unauthorized_response("Invalid user ID in token"),
    };

    match storage::find_user_by_id(&state.pool, user_id).await {
        Ok(Some(user)) if user.is_admin() => next.run(request).await,
        Ok(Some(_)) => forbidden_response("Admin access required"),
        Ok(None) => unauthorized_response("User no longer exists"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to check admin role");
            crate::error::ApiError::Database(e).into_response()
        }
    }
}

/// Optional request identity for handlers that need a custom 401 body.
///
/// Routes behind `require_auth` get `Extension<Claims>` instead; this
/// extractor is for endpoints like rating submission that return their
/// own unauthenticated error message.
pub struct MaybeUser(pub Option<Claims>);

impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(claims_from_headers(state, &parts.headers)))
    }
}

/// Remove headers that identify the server stack from every response.
pub async fn strip_identifying_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.remove(header::SERVER);
    headers.remove("x-powered-by");
    response
}

/// Helper to create an unauthorized (401) response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse::new(message);
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

/// Helper to create a forbidden (403) response.
fn forbidden_response(message: &str) -> Response {
    let body = ErrorResponse::new(message);
    (StatusCode::FORBIDDEN, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::{JwtAuth, JwtConfig, UserRole};

    fn create_test_jwt_auth() -> JwtAuth {
        JwtAuth::new(JwtConfig {
            secret: "test-secret-key-12345".to_string(),
            expiry_hours: 1,
            ..Default::default()
        })
    }

    #[test]
    fn test_unauthorized_response() {
        let response = unauthorized_response("Test message");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_forbidden_response() {
        let response = forbidden_response("Test message");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_jwt_token_round_trip() {
        let auth = create_test_jwt_auth();
        let token = auth.create_token("user123", "alice", UserRole::User).unwrap();
        assert!(!token.is_empty());

        let claims = auth.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_strip_identifying_headers() {
        let mut response = Response::new(Body::empty());
        response
            .headers_mut()
            .insert(header::SERVER, "axum".parse().unwrap());
        response
            .headers_mut()
            .insert("x-powered-by", "tokio".parse().unwrap());

        let sanitized = strip_identifying_headers(response).await;
        assert!(sanitized.headers().get(header::SERVER).is_none());
        assert!(sanitized.headers().get("x-powered-by").is_none());
    }
}
