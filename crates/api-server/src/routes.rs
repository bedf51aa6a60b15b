//! API route definitions.

use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{admin, auth, badges, health, ratings, traders, uploads, users};
use crate::middleware;
use crate::state::AppState;

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "RateMyKOL API",
        version = "1.0.0",
        description = "REST API for rating crypto-trading influencers"
    ),
    paths(
        health::health_check,
        health::readiness,
        auth::register,
        auth::login,
        auth::logout,
        auth::get_current_user,
        auth::admin_status,
        auth::oauth_login,
        auth::oauth_callback,
        traders::list_traders,
        traders::get_trader,
        traders::create_trader,
        traders::update_trader,
        traders::delete_trader,
        ratings::list_trader_ratings,
        ratings::submit_rating,
        ratings::vote_review,
        badges::user_badges,
        badges::trader_badges,
        users::update_profile,
        users::list_users,
        users::delete_user,
        admin::kolscan_leaderboard,
        admin::import_kolscan_traders,
        uploads::upload_profile_image,
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            health::HealthResponse,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            auth::UserInfo,
            auth::LogoutResponse,
            auth::AdminStatusResponse,
            auth::OAuthLoginResponse,
            traders::TraderResponse,
            traders::RatingStatsResponse,
            traders::CreateTraderRequest,
            traders::UpdateTraderRequest,
            traders::DeleteResponse,
            ratings::SubmitRatingRequest,
            ratings::RatingResponse,
            ratings::SubmitRatingResponse,
            ratings::VoteRequest,
            ratings::VoteResponse,
            badges::BadgeResponse,
            users::UpdateProfileRequest,
            users::UserListItem,
            admin::ScrapedTraderResponse,
            admin::ImportResponse,
            uploads::UploadResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, login, and OAuth"),
        (name = "traders", description = "Trader browsing, search, and admin management"),
        (name = "ratings", description = "Rating submission and review votes"),
        (name = "badges", description = "Earned achievement badges"),
        (name = "users", description = "Profiles and admin user management"),
        (name = "admin", description = "Kolscan leaderboard import"),
        (name = "uploads", description = "File uploads"),
    )
)]
pub struct ApiDoc;

/// Create the main router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Open endpoints. Rating submission and voting take an optional
    // identity so they can return their own 401 bodies.
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/oauth/login", get(auth::oauth_login))
        .route("/api/auth/oauth/callback", get(auth::oauth_callback))
        .route("/api/traders", get(traders::list_traders))
        .route("/api/traders/{id}", get(traders::get_trader))
        .route("/api/traders/{id}/ratings", get(ratings::list_trader_ratings))
        .route("/api/traders/{id}/ratings", post(ratings::submit_rating))
        .route("/api/reviews/{id}/vote", post(ratings::vote_review))
        .route("/api/traders/{id}/badges", get(badges::trader_badges))
        .route("/api/users/{id}/badges", get(badges::user_badges));

    // Endpoints requiring a valid token.
    let authed_routes = Router::new()
        .route("/api/auth/me", get(auth::get_current_user))
        .route("/api/auth/admin-status", get(auth::admin_status))
        .route("/api/users/me", put(users::update_profile))
        .route("/api/upload/profile-image", post(uploads::upload_profile_image))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // Admin endpoints: authenticated, then role re-checked against the store.
    let admin_routes = Router::new()
        .route("/api/traders", post(traders::create_trader))
        .route("/api/traders/{id}", put(traders::update_trader))
        .route("/api/traders/{id}", delete(traders::delete_trader))
        .route("/api/admin/users", get(users::list_users))
        .route("/api/admin/users/{id}", delete(users::delete_user))
        .route("/api/admin/kolscan-leaderboard", get(admin::kolscan_leaderboard))
        .route(
            "/api/admin/import-kolscan-traders",
            post(admin::import_kolscan_traders),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(authed_routes)
        .merge(admin_routes)
        // Uploaded profile images
        .nest_service("/uploads", ServeDir::new(&state.upload_dir))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add state
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().unwrap();
        assert!(json.contains("RateMyKOL API"));
        assert!(json.contains("/api/traders"));
        assert!(json.contains("/api/reviews/{id}/vote"));
        assert!(json.contains("/api/admin/import-kolscan-traders"));
    }
}
