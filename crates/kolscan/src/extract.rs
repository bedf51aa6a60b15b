//! HTML extraction strategies for the leaderboard page.
//!
//! Ordered heuristics, tried most-structured first. A strategy returns
//! `None` when the markup it probes for is absent; the first strategy that
//! produces rows wins. Results are deduplicated by wallet address and
//! capped.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::OnceLock;

/// One trader row extracted from the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedTrader {
    pub name: String,
    pub wallet_address: String,
    pub twitter_url: Option<String>,
}

/// Maximum rows returned by a scrape.
pub const MAX_RESULTS: usize = 50;

type Strategy = fn(&str) -> Option<Vec<ScrapedTrader>>;

/// Extraction strategies in priority order.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("embedded-state", extract_from_embedded_state),
    ("account-links", extract_from_account_links),
    ("wallet-tokens", extract_from_wallet_tokens),
];

/// Run the strategies against raw page HTML.
///
/// A page no strategy recognizes yields an empty vec, deliberately not an
/// error.
pub fn extract_traders(html: &str) -> Vec<ScrapedTrader> {
    for (name, strategy) in STRATEGIES {
        match strategy(html) {
            Some(rows) if !rows.is_empty() => {
                tracing::debug!(strategy = name, rows = rows.len(), "Extraction strategy matched");
                return dedup_and_cap(rows);
            }
            _ => {
                tracing::trace!(strategy = name, "Extraction strategy missed");
            }
        }
    }
    Vec::new()
}

fn wallet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").unwrap())
}

fn is_wallet_address(candidate: &str) -> bool {
    wallet_re().is_match(candidate)
}

/// Shortened wallet used when the page carries no display name.
fn short_name(wallet: &str) -> String {
    if wallet.len() <= 8 {
        return wallet.to_string();
    }
    format!("{}...{}", &wallet[..4], &wallet[wallet.len() - 4..])
}

fn normalize_twitter(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Some(trimmed.to_string());
    }
    Some(format!("https://x.com/{}", trimmed.trim_start_matches('@')))
}

/// Strategy 1: JSON state blob embedded by the site's framework.
fn extract_from_embedded_state(html: &str) -> Option<Vec<ScrapedTrader>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r#"(?s)<script[^>]*id="__NEXT_DATA__"[^>]*>(.*?)</script>"#).unwrap()
    });

    let blob = re.captures(html)?.get(1)?.as_str();
    let state: Value = serde_json::from_str(blob).ok()?;

    let mut rows = Vec::new();
    collect_trader_objects(&state, &mut rows);
    Some(rows)
}

fn collect_trader_objects(value: &Value, out: &mut Vec<ScrapedTrader>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_trader_objects(item, out);
            }
        }
        Value::Object(map) => {
            if let Some(trader) = trader_from_object(map) {
                out.push(trader);
            }
            for nested in map.values() {
                collect_trader_objects(nested, out);
            }
        }
        _ => {}
    }
}

fn object_string(map: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        map.get(*key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn trader_from_object(map: &serde_json::Map<String, Value>) -> Option<ScrapedTrader> {
    let wallet = object_string(map, &["wallet_address", "walletAddress", "wallet", "address"])?;
    if !is_wallet_address(&wallet) {
        return None;
    }
    let name = object_string(map, &["name", "username", "handle", "displayName"])
        .unwrap_or_else(|| short_name(&wallet));
    let twitter = object_string(map, &["twitter_url", "twitterUrl", "twitter", "x"])
        .and_then(|raw| normalize_twitter(&raw));
    Some(ScrapedTrader {
        name,
        wallet_address: wallet,
        twitter_url: twitter,
    })
}

/// Strategy 2: profile links of the form `/account/<wallet>`.
fn extract_from_account_links(html: &str) -> Option<Vec<ScrapedTrader>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r#"(?s)<a[^>]+href="/account/([1-9A-HJ-NP-Za-km-z]{32,44})"[^>]*>(.*?)</a>"#)
            .unwrap()
    });

    let rows: Vec<ScrapedTrader> = re
        .captures_iter(html)
        .map(|caps| {
            let wallet = caps[1].to_string();
            let inner = strip_tags(&caps[2]);
            let name = if inner.is_empty() {
                short_name(&wallet)
            } else {
                inner
            };
            ScrapedTrader {
                name,
                wallet_address: wallet,
                twitter_url: None,
            }
        })
        .collect();

    if rows.is_empty() {
        None
    } else {
        Some(rows)
    }
}

/// Strategy 3: bare base58 tokens anywhere in the page. Last resort; names
/// are synthesized from the wallet itself.
fn extract_from_wallet_tokens(html: &str) -> Option<Vec<ScrapedTrader>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re =
        RE.get_or_init(|| Regex::new(r"\b[1-9A-HJ-NP-Za-km-z]{32,44}\b").unwrap());

    let rows: Vec<ScrapedTrader> = re
        .find_iter(html)
        .map(|m| {
            let wallet = m.as_str().to_string();
            ScrapedTrader {
                name: short_name(&wallet),
                wallet_address: wallet,
                twitter_url: None,
            }
        })
        .collect();

    if rows.is_empty() {
        None
    } else {
        Some(rows)
    }
}

fn strip_tags(fragment: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"<[^>]*>").unwrap());
    let text = re.replace_all(fragment, " ");
    text.replace("&amp;", "&")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn dedup_and_cap(rows: Vec<ScrapedTrader>) -> Vec<ScrapedTrader> {
    let mut seen = HashSet::new();
    let mut out: Vec<ScrapedTrader> = rows
        .into_iter()
        .filter(|row| seen.insert(row.wallet_address.clone()))
        .collect();
    out.truncate(MAX_RESULTS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALLET_A: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";
    const WALLET_B: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

    #[test]
    fn test_embedded_state_strategy() {
        let html = format!(
            r#"<html><body><script id="__NEXT_DATA__" type="application/json">
            {{"props":{{"pageProps":{{"leaderboard":[
                {{"name":"Alpha Hunter","wallet_address":"{WALLET_A}","twitter":"@alphahunter"}},
                {{"name":"Degen Dave","wallet_address":"{WALLET_B}"}}
            ]}}}}}}</script></body></html>"#
        );

        let traders = extract_traders(&html);
        assert_eq!(traders.len(), 2);
        assert_eq!(traders[0].name, "Alpha Hunter");
        assert_eq!(traders[0].wallet_address, WALLET_A);
        assert_eq!(
            traders[0].twitter_url.as_deref(),
            Some("https://x.com/alphahunter")
        );
        assert_eq!(traders[1].twitter_url, None);
    }

    #[test]
    fn test_account_links_strategy() {
        let html = format!(
            r#"<div class="row"><a href="/account/{WALLET_A}"><span>Alpha Hunter</span></a></div>
               <div class="row"><a href="/account/{WALLET_B}" class="lb"><b>Degen</b> Dave</a></div>"#
        );

        let traders = extract_traders(&html);
        assert_eq!(traders.len(), 2);
        assert_eq!(traders[0].name, "Alpha Hunter");
        assert_eq!(traders[1].name, "Degen Dave");
        assert_eq!(traders[1].wallet_address, WALLET_B);
    }

    #[test]
    fn test_embedded_state_wins_over_links() {
        // Both shapes present: the JSON blob is more structured and must win.
        let html = format!(
            r#"<script id="__NEXT_DATA__">{{"rows":[{{"name":"From State","wallet":"{WALLET_A}"}}]}}</script>
               <a href="/account/{WALLET_B}">From Links</a>"#
        );

        let traders = extract_traders(&html);
        assert_eq!(traders.len(), 1);
        assert_eq!(traders[0].name, "From State");
    }

    #[test]
    fn test_wallet_token_fallback() {
        let html = format!("<pre>top wallet today: {WALLET_A} (unranked)</pre>");
        let traders = extract_traders(&html);
        assert_eq!(traders.len(), 1);
        assert_eq!(traders[0].wallet_address, WALLET_A);
        assert_eq!(traders[0].name, "7xKX...gAsU");
    }

    #[test]
    fn test_unrecognized_page_yields_empty_not_error() {
        assert!(extract_traders("<html><body>maintenance</body></html>").is_empty());
        assert!(extract_traders("").is_empty());
    }

    #[test]
    fn test_dedup_by_wallet() {
        let html = format!(
            r#"<a href="/account/{WALLET_A}">First Listing</a>
               <a href="/account/{WALLET_A}">Duplicate Listing</a>"#
        );
        let traders = extract_traders(&html);
        assert_eq!(traders.len(), 1);
        assert_eq!(traders[0].name, "First Listing");
    }

    #[test]
    fn test_result_cap() {
        // 58 distinct wallets built from the base58 alphabet.
        let alphabet = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
        let base = &WALLET_A[..WALLET_A.len() - 1];
        let html: String = alphabet
            .chars()
            .map(|c| format!("<a href=\"/account/{base}{c}\">Row</a>\n"))
            .collect();

        let traders = extract_traders(&html);
        assert_eq!(traders.len(), MAX_RESULTS);
    }

    #[test]
    fn test_short_candidates_ignored() {
        // Too short to be a wallet address.
        let html = r#"<a href="/account/abc123">Not a wallet</a>"#;
        assert!(extract_traders(html).is_empty());
    }
}
