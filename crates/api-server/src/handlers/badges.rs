//! Badge listing handlers.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use kol_core::{BadgeTier, TraderBadgeKind, UserBadgeKind};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::storage;

/// One earned badge with display metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct BadgeResponse {
    /// Badge kind identifier (e.g. "reviewer", "top_rated").
    pub kind: String,
    /// Tier identifier ("bronze", "silver", "gold").
    pub tier: String,
    /// Display label for the kind.
    pub label: String,
    /// Display description for the kind.
    pub description: String,
    /// When the badge was awarded; absent for just-earned badges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awarded_at: Option<DateTime<Utc>>,
}

impl BadgeResponse {
    pub fn user(kind: UserBadgeKind, tier: BadgeTier, awarded_at: Option<DateTime<Utc>>) -> Self {
        Self {
            kind: kind.slug().to_string(),
            tier: tier.slug().to_string(),
            label: kind.label().to_string(),
            description: kind.description().to_string(),
            awarded_at,
        }
    }

    pub fn trader(
        kind: TraderBadgeKind,
        tier: BadgeTier,
        awarded_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            kind: kind.slug().to_string(),
            tier: tier.slug().to_string(),
            label: kind.label().to_string(),
            description: kind.description().to_string(),
            awarded_at,
        }
    }
}

/// List a user's earned badges.
#[utoipa::path(
    get,
    path = "/api/users/{id}/badges",
    tag = "badges",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Earned badges", body = Vec<BadgeResponse>),
        (status = 404, description = "User not found"),
    )
)]
pub async fn user_badges(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<BadgeResponse>>> {
    if storage::find_user_by_id(&state.pool, id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".into()));
    }

    let rows = storage::badges_for_user(&state.pool, id).await?;
    let badges = rows
        .into_iter()
        .filter_map(|row| {
            let kind = UserBadgeKind::from_i16(row.kind)?;
            let tier = BadgeTier::from_i16(row.tier)?;
            Some(BadgeResponse::user(kind, tier, Some(row.awarded_at)))
        })
        .collect();

    Ok(Json(badges))
}

/// List a trader's earned badges.
#[utoipa::path(
    get,
    path = "/api/traders/{id}/badges",
    tag = "badges",
    params(("id" = String, Path, description = "Trader ID")),
    responses(
        (status = 200, description = "Earned badges", body = Vec<BadgeResponse>),
        (status = 404, description = "Trader not found"),
    )
)]
pub async fn trader_badges(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<BadgeResponse>>> {
    if storage::find_trader(&state.pool, id).await?.is_none() {
        return Err(ApiError::NotFound("Trader not found".into()));
    }

    let rows = storage::badges_for_trader(&state.pool, id).await?;
    let badges = rows
        .into_iter()
        .filter_map(|row| {
            let kind = TraderBadgeKind::from_i16(row.kind)?;
            let tier = BadgeTier::from_i16(row.tier)?;
            Some(BadgeResponse::trader(kind, tier, Some(row.awarded_at)))
        })
        .collect();

    Ok(Json(badges))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_response_metadata() {
        let badge = BadgeResponse::user(UserBadgeKind::Reviewer, BadgeTier::Gold, None);
        assert_eq!(badge.kind, "reviewer");
        assert_eq!(badge.tier, "gold");
        assert_eq!(badge.label, "Reviewer");
        assert!(badge.awarded_at.is_none());

        let badge = BadgeResponse::trader(TraderBadgeKind::TopRated, BadgeTier::Bronze, None);
        assert_eq!(badge.kind, "top_rated");
        assert_eq!(badge.tier, "bronze");
    }
}
