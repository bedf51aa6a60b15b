//! Kolscan leaderboard scraper.
//!
//! Best-effort import source for trader records. The external page carries
//! no schema contract; extraction is an ordered list of heuristics over the
//! raw HTML, and a page none of them understand yields zero rows rather
//! than an error. Only network, timeout, and HTTP-status failures are
//! errors.

pub mod extract;

use std::time::Duration;
use thiserror::Error;

pub use extract::{extract_traders, ScrapedTrader};

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Leaderboard fetch failed with status {status}")]
    Status { status: u16 },
}

/// Client for the external kolscan leaderboard page.
pub struct KolscanClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl KolscanClient {
    /// Default leaderboard URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://kolscan.io/leaderboard";

    /// Fixed timeout on the leaderboard fetch.
    const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: Option<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Self::FETCH_TIMEOUT)
            .connect_timeout(Self::FETCH_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");
        Self {
            base_url: base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            http_client,
        }
    }

    /// Create from the `KOLSCAN_URL` environment variable, falling back to
    /// the default URL.
    pub fn from_env() -> Self {
        Self::new(std::env::var("KOLSCAN_URL").ok())
    }

    /// Fetch the leaderboard page and extract trader rows.
    ///
    /// Returns `Ok(vec![])` when the page loads but no extraction strategy
    /// recognizes it.
    pub async fn fetch_leaderboard(&self) -> Result<Vec<ScrapedTrader>, ScrapeError> {
        let response = self.http_client.get(&self.base_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        let traders = extract_traders(&html);
        tracing::info!(
            url = %self.base_url,
            count = traders.len(),
            "Scraped kolscan leaderboard"
        );
        Ok(traders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        let client = KolscanClient::new(None);
        assert_eq!(client.base_url, KolscanClient::DEFAULT_BASE_URL);

        let client = KolscanClient::new(Some("https://mirror.test/lb".to_string()));
        assert_eq!(client.base_url, "https://mirror.test/lb");
    }
}
