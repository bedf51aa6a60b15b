//! Admin handlers for the kolscan leaderboard import.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use kolscan::{ScrapeError, ScrapedTrader};

use crate::error::{is_unique_violation, ApiError, ApiResult};
use crate::state::AppState;
use crate::storage::{self, NewTrader};

/// One scraped leaderboard row.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScrapedTraderResponse {
    pub name: String,
    pub wallet_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
    /// Whether a trader with this wallet already exists in the store.
    pub already_imported: bool,
}

/// Result of a leaderboard import.
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportResponse {
    /// Traders inserted.
    pub imported: usize,
    /// Rows skipped because the wallet already exists.
    pub skipped: usize,
    /// Rows scraped from the page.
    pub total: usize,
}

fn map_scrape_error(e: ScrapeError) -> ApiError {
    tracing::warn!(error = %e, "Kolscan leaderboard fetch failed");
    ApiError::ServiceUnavailable("Failed to fetch kolscan leaderboard".into())
}

/// Preview the kolscan leaderboard (admin only).
///
/// A page the extractor does not recognize yields an empty list; only a
/// network or HTTP failure is an error.
#[utoipa::path(
    get,
    path = "/api/admin/kolscan-leaderboard",
    tag = "admin",
    responses(
        (status = 200, description = "Scraped leaderboard rows", body = Vec<ScrapedTraderResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 503, description = "Leaderboard source unavailable"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn kolscan_leaderboard(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ScrapedTraderResponse>>> {
    let rows = state
        .kolscan
        .fetch_leaderboard()
        .await
        .map_err(map_scrape_error)?;

    let mut responses = Vec::with_capacity(rows.len());
    for row in rows {
        let already_imported =
            storage::trader_wallet_exists(&state.pool, &row.wallet_address).await?;
        responses.push(ScrapedTraderResponse {
            name: row.name,
            wallet_address: row.wallet_address,
            twitter_url: row.twitter_url,
            already_imported,
        });
    }

    Ok(Json(responses))
}

/// Import kolscan leaderboard traders into the store (admin only).
///
/// Deduplicates by wallet address against existing traders; a fetch
/// failure is a failed import with zero rows imported.
#[utoipa::path(
    post,
    path = "/api/admin/import-kolscan-traders",
    tag = "admin",
    responses(
        (status = 200, description = "Import summary", body = ImportResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 503, description = "Leaderboard source unavailable"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn import_kolscan_traders(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ImportResponse>> {
    let rows = state
        .kolscan
        .fetch_leaderboard()
        .await
        .map_err(map_scrape_error)?;

    let total = rows.len();
    let mut imported = 0;
    let mut skipped = 0;

    for row in rows {
        if storage::trader_wallet_exists(&state.pool, &row.wallet_address).await? {
            skipped += 1;
            continue;
        }

        match storage::insert_trader(&state.pool, &scraped_to_new_trader(row)).await {
            Ok(_) => imported += 1,
            // Lost a race with a concurrent import; treat as a skip.
            Err(e) if is_unique_violation(&e) => skipped += 1,
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(imported, skipped, total, "Kolscan import finished");
    Ok(Json(ImportResponse {
        imported,
        skipped,
        total,
    }))
}

fn scraped_to_new_trader(row: ScrapedTrader) -> NewTrader {
    NewTrader {
        name: row.name,
        wallet_address: row.wallet_address,
        bio: None,
        specialty: None,
        verified: false,
        twitter_url: row.twitter_url,
        profile_image_url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scraped_rows_import_unverified() {
        let new = scraped_to_new_trader(ScrapedTrader {
            name: "Alpha Hunter".to_string(),
            wallet_address: "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU".to_string(),
            twitter_url: Some("https://x.com/alphahunter".to_string()),
        });
        assert!(!new.verified);
        assert_eq!(new.name, "Alpha Hunter");
        assert!(new.bio.is_none());
    }
}
