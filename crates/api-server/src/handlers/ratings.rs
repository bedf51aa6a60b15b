//! Rating submission, listing, and review vote handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use kol_core::{eligible_trader_badges, eligible_user_badges, RatingScores};

use crate::error::{is_unique_violation, ApiError, ApiResult};
use crate::handlers::badges::BadgeResponse;
use crate::middleware::MaybeUser;
use crate::state::AppState;
use crate::storage::{self, NewRating, RatingRecord};

/// Maximum length of a rating comment.
const MAX_COMMENT_LEN: usize = 2000;
/// Maximum number of tags on a rating.
const MAX_TAGS: usize = 10;
/// Maximum length of one tag.
const MAX_TAG_LEN: usize = 40;

/// Request to submit a rating.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitRatingRequest {
    pub overall: i16,
    pub strategy: i16,
    pub communication: i16,
    pub reliability: i16,
    pub profitability: i16,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One rating as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct RatingResponse {
    pub id: String,
    pub trader_id: String,
    pub user_id: String,
    /// Reviewer's username.
    pub username: String,
    pub overall: i16,
    pub strategy: i16,
    pub communication: i16,
    pub reliability: i16,
    pub profitability: i16,
    pub comment: String,
    pub tags: Vec<String>,
    pub helpful_count: i32,
    pub not_helpful_count: i32,
    pub created_at: DateTime<Utc>,
}

impl RatingResponse {
    fn from_record(record: RatingRecord, username: String) -> Self {
        Self {
            id: record.id.to_string(),
            trader_id: record.trader_id.to_string(),
            user_id: record.user_id.to_string(),
            username,
            overall: record.overall,
            strategy: record.strategy,
            communication: record.communication,
            reliability: record.reliability,
            profitability: record.profitability,
            comment: record.comment,
            tags: record.tags,
            helpful_count: record.helpful_count,
            not_helpful_count: record.not_helpful_count,
            created_at: record.created_at,
        }
    }
}

/// Response to a rating submission. Newly crossed badge thresholds are
/// surfaced here once, for the client's celebratory notification.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitRatingResponse {
    pub rating: RatingResponse,
    pub new_user_badges: Vec<BadgeResponse>,
    pub new_trader_badges: Vec<BadgeResponse>,
}

/// Request to vote on a review.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VoteRequest {
    /// true = helpful, false = not helpful.
    pub helpful: bool,
}

/// Updated counters after a vote.
#[derive(Debug, Serialize, ToSchema)]
pub struct VoteResponse {
    pub helpful_count: i32,
    pub not_helpful_count: i32,
}

fn validate_rating_body(req: &SubmitRatingRequest) -> Result<RatingScores, ApiError> {
    let scores = RatingScores {
        overall: req.overall,
        strategy: req.strategy,
        communication: req.communication,
        reliability: req.reliability,
        profitability: req.profitability,
    };
    scores
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if req.comment.len() > MAX_COMMENT_LEN {
        return Err(ApiError::BadRequest(format!(
            "Comment must be at most {MAX_COMMENT_LEN} characters"
        )));
    }
    if req.tags.len() > MAX_TAGS {
        return Err(ApiError::BadRequest(format!(
            "At most {MAX_TAGS} tags are allowed"
        )));
    }
    if req
        .tags
        .iter()
        .any(|tag| tag.trim().is_empty() || tag.len() > MAX_TAG_LEN)
    {
        return Err(ApiError::BadRequest(format!(
            "Tags must be non-empty and at most {MAX_TAG_LEN} characters"
        )));
    }

    Ok(scores)
}

/// List a trader's ratings, newest first.
#[utoipa::path(
    get,
    path = "/api/traders/{id}/ratings",
    tag = "ratings",
    params(("id" = String, Path, description = "Trader ID")),
    responses(
        (status = 200, description = "Ratings for the trader", body = Vec<RatingResponse>),
        (status = 404, description = "Trader not found"),
    )
)]
pub async fn list_trader_ratings(
    State(state): State<Arc<AppState>>,
    Path(trader_id): Path<Uuid>,
) -> ApiResult<Json<Vec<RatingResponse>>> {
    if storage::find_trader(&state.pool, trader_id).await?.is_none() {
        return Err(ApiError::NotFound("Trader not found".into()));
    }

    let rows = storage::ratings_for_trader(&state.pool, trader_id).await?;
    let ratings = rows
        .into_iter()
        .map(|row| RatingResponse {
            id: row.id.to_string(),
            trader_id: row.trader_id.to_string(),
            user_id: row.user_id.to_string(),
            username: row.username,
            overall: row.overall,
            strategy: row.strategy,
            communication: row.communication,
            reliability: row.reliability,
            profitability: row.profitability,
            comment: row.comment,
            tags: row.tags,
            helpful_count: row.helpful_count,
            not_helpful_count: row.not_helpful_count,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(ratings))
}

/// Submit a rating for a trader.
#[utoipa::path(
    post,
    path = "/api/traders/{id}/ratings",
    tag = "ratings",
    params(("id" = String, Path, description = "Trader ID")),
    request_body = SubmitRatingRequest,
    responses(
        (status = 201, description = "Rating created", body = SubmitRatingResponse),
        (status = 400, description = "Invalid scores, comment, or tags"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Trader not found"),
        (status = 409, description = "Already reviewed this trader"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn submit_rating(
    State(state): State<Arc<AppState>>,
    Path(trader_id): Path<String>,
    MaybeUser(user): MaybeUser,
    Json(req): Json<SubmitRatingRequest>,
) -> ApiResult<(StatusCode, Json<SubmitRatingResponse>)> {
    // Identity first: an unauthenticated request gets its 401 before any
    // path or body validation.
    let claims = user.ok_or_else(|| {
        ApiError::Unauthorized("Authentication required to leave a review".into())
    })?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::Internal("Invalid user ID in token".into()))?;

    let trader_id = Uuid::parse_str(&trader_id)
        .map_err(|_| ApiError::NotFound("Trader not found".into()))?;
    let scores = validate_rating_body(&req)?;

    if storage::find_trader(&state.pool, trader_id).await?.is_none() {
        return Err(ApiError::NotFound("Trader not found".into()));
    }

    let new = NewRating {
        trader_id,
        user_id,
        scores,
        comment: req.comment,
        tags: req.tags.iter().map(|t| t.trim().to_string()).collect(),
    };

    let record = match storage::insert_rating(&state.pool, &new).await {
        Ok(record) => record,
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::Conflict(
                "You have already reviewed this trader".into(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(rating_id = %record.id, trader_id = %trader_id, user_id = %user_id, "Rating submitted");

    // Badge awards are best-effort: a failure here never fails the
    // submission, and newly crossed thresholds are reported at most once.
    let (new_user_badges, new_trader_badges) =
        award_badges_after_rating(&state, user_id, trader_id).await;

    let response = SubmitRatingResponse {
        rating: RatingResponse::from_record(record, claims.username),
        new_user_badges,
        new_trader_badges,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Vote a review helpful or not helpful.
#[utoipa::path(
    post,
    path = "/api/reviews/{id}/vote",
    tag = "ratings",
    params(("id" = String, Path, description = "Rating ID")),
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Vote recorded", body = VoteResponse),
        (status = 400, description = "Voting on own review"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Review not found"),
        (status = 409, description = "Already voted on this review"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn vote_review(
    State(state): State<Arc<AppState>>,
    Path(rating_id): Path<String>,
    MaybeUser(user): MaybeUser,
    Json(req): Json<VoteRequest>,
) -> ApiResult<Json<VoteResponse>> {
    let claims =
        user.ok_or_else(|| ApiError::Unauthorized("Authentication required to vote".into()))?;
    let voter_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::Internal("Invalid user ID in token".into()))?;

    let rating_id = Uuid::parse_str(&rating_id)
        .map_err(|_| ApiError::NotFound("Review not found".into()))?;
    let rating = storage::find_rating(&state.pool, rating_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Review not found".into()))?;

    if rating.user_id == voter_id {
        return Err(ApiError::BadRequest(
            "You cannot vote on your own review".into(),
        ));
    }

    let (helpful_count, not_helpful_count) =
        match storage::record_vote(&state.pool, rating_id, voter_id, req.helpful).await {
            Ok(counters) => counters,
            Err(e) if is_unique_violation(&e) => {
                return Err(ApiError::Conflict(
                    "You have already voted on this review".into(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

    // A helpful vote may push the review's author over a badge threshold.
    if req.helpful {
        award_author_badges(&state, rating.user_id).await;
    }

    Ok(Json(VoteResponse {
        helpful_count,
        not_helpful_count,
    }))
}

async fn award_badges_after_rating(
    state: &AppState,
    user_id: Uuid,
    trader_id: Uuid,
) -> (Vec<BadgeResponse>, Vec<BadgeResponse>) {
    let new_user_badges = match async {
        let inputs = storage::user_badge_inputs(&state.pool, user_id).await?;
        let eligible = eligible_user_badges(&inputs);
        storage::award_user_badges(&state.pool, user_id, &eligible).await
    }
    .await
    {
        Ok(newly) => newly
            .into_iter()
            .map(|(kind, tier)| BadgeResponse::user(kind, tier, None))
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, user_id = %user_id, "User badge award failed");
            Vec::new()
        }
    };

    let new_trader_badges = match async {
        let inputs = storage::trader_badge_inputs(&state.pool, trader_id).await?;
        let eligible = eligible_trader_badges(&inputs);
        storage::award_trader_badges(&state.pool, trader_id, &eligible).await
    }
    .await
    {
        Ok(newly) => newly
            .into_iter()
            .map(|(kind, tier)| BadgeResponse::trader(kind, tier, None))
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, trader_id = %trader_id, "Trader badge award failed");
            Vec::new()
        }
    };

    (new_user_badges, new_trader_badges)
}

async fn award_author_badges(state: &AppState, author_id: Uuid) {
    let result = async {
        let inputs = storage::user_badge_inputs(&state.pool, author_id).await?;
        let eligible = eligible_user_badges(&inputs);
        storage::award_user_badges(&state.pool, author_id, &eligible).await
    }
    .await;

    if let Err(e) = result {
        tracing::warn!(error = %e, user_id = %author_id, "Author badge award failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(overall: i16) -> SubmitRatingRequest {
        SubmitRatingRequest {
            overall,
            strategy: 4,
            communication: 4,
            reliability: 4,
            profitability: 4,
            comment: "Solid calls".to_string(),
            tags: vec!["alpha".to_string()],
        }
    }

    #[test]
    fn test_valid_rating_body() {
        let scores = validate_rating_body(&request(5)).unwrap();
        assert_eq!(scores.overall, 5);
    }

    #[test]
    fn test_out_of_range_score_rejected() {
        assert!(validate_rating_body(&request(0)).is_err());
        assert!(validate_rating_body(&request(6)).is_err());
    }

    #[test]
    fn test_oversized_comment_rejected() {
        let mut req = request(4);
        req.comment = "x".repeat(MAX_COMMENT_LEN + 1);
        assert!(validate_rating_body(&req).is_err());
    }

    #[test]
    fn test_tag_limits() {
        let mut req = request(4);
        req.tags = (0..MAX_TAGS + 1).map(|i| format!("tag{i}")).collect();
        assert!(validate_rating_body(&req).is_err());

        let mut req = request(4);
        req.tags = vec!["".to_string()];
        assert!(validate_rating_body(&req).is_err());

        let mut req = request(4);
        req.tags = vec!["t".repeat(MAX_TAG_LEN + 1)];
        assert!(validate_rating_body(&req).is_err());
    }
}
