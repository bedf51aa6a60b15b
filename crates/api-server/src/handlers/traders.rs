//! Trader browsing, search, and admin management handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use kol_core::RatingStats;

use crate::error::{is_unique_violation, ApiError, ApiResult};
use crate::state::AppState;
use crate::storage::{self, NewTrader, TraderRecord, TraderUpdate};

/// Aggregated rating statistics, one decimal place per average.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RatingStatsResponse {
    pub average_rating: f64,
    pub average_strategy: f64,
    pub average_communication: f64,
    pub average_reliability: f64,
    pub average_profitability: f64,
    pub total_ratings: i64,
}

impl From<RatingStats> for RatingStatsResponse {
    fn from(stats: RatingStats) -> Self {
        Self {
            average_rating: stats.average_rating,
            average_strategy: stats.average_strategy,
            average_communication: stats.average_communication,
            average_reliability: stats.average_reliability,
            average_profitability: stats.average_profitability,
            total_ratings: stats.total_ratings,
        }
    }
}

/// Trader profile with aggregated rating statistics.
#[derive(Debug, Serialize, ToSchema)]
pub struct TraderResponse {
    /// Trader ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Wallet address (unique).
    pub wallet_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    /// Verified by an administrator.
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Aggregated rating statistics.
    pub stats: RatingStatsResponse,
}

impl TraderResponse {
    fn new(trader: TraderRecord, stats: RatingStats) -> Self {
        Self {
            id: trader.id.to_string(),
            name: trader.name,
            wallet_address: trader.wallet_address,
            bio: trader.bio,
            specialty: trader.specialty,
            verified: trader.verified,
            twitter_url: trader.twitter_url,
            profile_image_url: trader.profile_image_url,
            created_at: trader.created_at,
            updated_at: trader.updated_at,
            stats: stats.into(),
        }
    }
}

/// Query parameters for trader search.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchTradersQuery {
    /// Case-insensitive substring matched against name and wallet address.
    pub q: Option<String>,
}

/// Request to create a trader (admin only).
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTraderRequest {
    pub name: String,
    pub wallet_address: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub twitter_url: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// Request to update a trader (admin only). Absent fields are unchanged.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTraderRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub twitter_url: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// Delete confirmation.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}

fn validate_trader_fields(name: &str, wallet_address: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() || name.len() > 100 {
        return Err(ApiError::BadRequest(
            "Trader name must be between 1 and 100 characters".into(),
        ));
    }
    if wallet_address.trim().is_empty() || wallet_address.len() > 64 {
        return Err(ApiError::BadRequest(
            "Wallet address must be between 1 and 64 characters".into(),
        ));
    }
    Ok(())
}

async fn trader_with_stats(
    state: &AppState,
    trader: TraderRecord,
) -> Result<TraderResponse, ApiError> {
    let stats = storage::trader_stats(&state.pool, trader.id).await?;
    Ok(TraderResponse::new(trader, stats))
}

/// List or search traders.
#[utoipa::path(
    get,
    path = "/api/traders",
    tag = "traders",
    params(SearchTradersQuery),
    responses(
        (status = 200, description = "Matching traders with rating statistics", body = Vec<TraderResponse>),
    )
)]
pub async fn list_traders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchTradersQuery>,
) -> ApiResult<Json<Vec<TraderResponse>>> {
    let traders = storage::search_traders(&state.pool, query.q.as_deref()).await?;

    let mut responses = Vec::with_capacity(traders.len());
    for trader in traders {
        responses.push(trader_with_stats(&state, trader).await?);
    }

    Ok(Json(responses))
}

/// Get one trader's profile and rating statistics.
#[utoipa::path(
    get,
    path = "/api/traders/{id}",
    tag = "traders",
    params(("id" = String, Path, description = "Trader ID")),
    responses(
        (status = 200, description = "Trader profile", body = TraderResponse),
        (status = 404, description = "Trader not found"),
    )
)]
pub async fn get_trader(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TraderResponse>> {
    let trader = storage::find_trader(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Trader not found".into()))?;

    Ok(Json(trader_with_stats(&state, trader).await?))
}

/// Create a trader record (admin only).
#[utoipa::path(
    post,
    path = "/api/traders",
    tag = "traders",
    request_body = CreateTraderRequest,
    responses(
        (status = 201, description = "Trader created", body = TraderResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Wallet address already registered"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_trader(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTraderRequest>,
) -> ApiResult<(StatusCode, Json<TraderResponse>)> {
    validate_trader_fields(&req.name, &req.wallet_address)?;

    let new = NewTrader {
        name: req.name,
        wallet_address: req.wallet_address,
        bio: req.bio,
        specialty: req.specialty,
        verified: req.verified,
        twitter_url: req.twitter_url,
        profile_image_url: req.profile_image_url,
    };

    let trader = match storage::insert_trader(&state.pool, &new).await {
        Ok(trader) => trader,
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::Conflict(
                "A trader with this wallet address already exists".into(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(trader_id = %trader.id, name = %trader.name, "Trader created");

    Ok((
        StatusCode::CREATED,
        Json(TraderResponse::new(trader, RatingStats::default())),
    ))
}

/// Update a trader record (admin only).
#[utoipa::path(
    put,
    path = "/api/traders/{id}",
    tag = "traders",
    params(("id" = String, Path, description = "Trader ID")),
    request_body = UpdateTraderRequest,
    responses(
        (status = 200, description = "Updated trader", body = TraderResponse),
        (status = 404, description = "Trader not found"),
        (status = 409, description = "Wallet address already registered"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_trader(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTraderRequest>,
) -> ApiResult<Json<TraderResponse>> {
    if let Some(ref name) = req.name {
        if name.trim().is_empty() || name.len() > 100 {
            return Err(ApiError::BadRequest(
                "Trader name must be between 1 and 100 characters".into(),
            ));
        }
    }
    if let Some(ref wallet) = req.wallet_address {
        if wallet.trim().is_empty() || wallet.len() > 64 {
            return Err(ApiError::BadRequest(
                "Wallet address must be between 1 and 64 characters".into(),
            ));
        }
    }

    let update = TraderUpdate {
        name: req.name,
        wallet_address: req.wallet_address,
        bio: req.bio,
        specialty: req.specialty,
        verified: req.verified,
        twitter_url: req.twitter_url,
        profile_image_url: req.profile_image_url,
    };

    let trader = match storage::update_trader(&state.pool, id, &update).await {
        Ok(Some(trader)) => trader,
        Ok(None) => return Err(ApiError::NotFound("Trader not found".into())),
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::Conflict(
                "A trader with this wallet address already exists".into(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(trader_with_stats(&state, trader).await?))
}

/// Delete a trader and all associated ratings and badges (admin only).
#[utoipa::path(
    delete,
    path = "/api/traders/{id}",
    tag = "traders",
    params(("id" = String, Path, description = "Trader ID")),
    responses(
        (status = 200, description = "Trader deleted", body = DeleteResponse),
        (status = 404, description = "Trader not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_trader(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = storage::delete_trader_cascade(&state.pool, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Trader not found".into()));
    }

    tracing::info!(trader_id = %id, "Trader deleted with ratings and badges");
    Ok(Json(DeleteResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trader_field_validation() {
        assert!(validate_trader_fields("Alpha Hunter", "7xKXtg2CW87d97TXJSDpbD5jBkheTqA8").is_ok());
        assert!(validate_trader_fields("", "wallet").is_err());
        assert!(validate_trader_fields("  ", "wallet").is_err());
        assert!(validate_trader_fields(&"n".repeat(101), "wallet").is_err());
        assert!(validate_trader_fields("name", "").is_err());
        assert!(validate_trader_fields("name", &"w".repeat(65)).is_err());
    }

    #[test]
    fn test_stats_response_from_default() {
        let stats: RatingStatsResponse = RatingStats::default().into();
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.total_ratings, 0);
    }
}
