//! OAuth identity flow.
//!
//! Standard authorization-code exchange against a provider configured
//! entirely through the environment. The provider's user-info payload is
//! normalized into an [`OAuthIdentity`]; field names vary between
//! providers, so parsing probes the common spellings.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider response missing {0}")]
    MissingField(&'static str),
}

/// OAuth provider endpoints and credentials.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub redirect_url: String,
}

impl OAuthConfig {
    /// Load from environment variables. Returns `None` when the provider is
    /// not configured, which disables the OAuth endpoints.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            client_id: std::env::var("OAUTH_CLIENT_ID").ok()?,
            client_secret: std::env::var("OAUTH_CLIENT_SECRET").ok()?,
            auth_url: std::env::var("OAUTH_AUTH_URL").ok()?,
            token_url: std::env::var("OAUTH_TOKEN_URL").ok()?,
            userinfo_url: std::env::var("OAUTH_USERINFO_URL").ok()?,
            redirect_url: std::env::var("OAUTH_REDIRECT_URL").ok()?,
        })
    }
}

/// Normalized identity returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthIdentity {
    /// Stable subject identifier at the provider.
    pub subject: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// OAuth client for the configured provider.
pub struct OAuthClient {
    config: OAuthConfig,
    http: reqwest::Client,
}

impl OAuthClient {
    pub fn new(config: OAuthConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to build HTTP client");
        Self { config, http }
    }

    /// URL the browser is sent to for the provider's consent screen.
    pub fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&state={}",
            self.config.auth_url, self.config.client_id, self.config.redirect_url, state
        )
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_url.as_str()),
        ];

        let response: TokenResponse = self
            .http
            .post(&self.config.token_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&params)
            .send()
            .await?
            .json()
            .await?;

        match response.access_token {
            Some(token) => Ok(token),
            None => Err(OAuthError::Provider(
                response
                    .error_description
                    .or(response.error)
                    .unwrap_or_else(|| "token exchange failed".to_string()),
            )),
        }
    }

    /// Fetch and normalize the authenticated user's identity.
    pub async fn fetch_identity(&self, access_token: &str) -> Result<OAuthIdentity, OAuthError> {
        let payload: serde_json::Value = self
            .http
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .header(reqwest::header::USER_AGENT, "ratemykol")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_identity(&payload)
    }
}

fn string_field(payload: &serde_json::Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        let value = &payload[*key];
        if let Some(s) = value.as_str() {
            (!s.is_empty()).then(|| s.to_string())
        } else {
            // Some providers return numeric ids.
            value.as_i64().map(|n| n.to_string())
        }
    })
}

fn parse_identity(payload: &serde_json::Value) -> Result<OAuthIdentity, OAuthError> {
    let subject =
        string_field(payload, &["sub", "id"]).ok_or(OAuthError::MissingField("subject"))?;
    Ok(OAuthIdentity {
        subject,
        username: string_field(payload, &["preferred_username", "username", "login", "name"]),
        email: string_field(payload, &["email"]),
        avatar_url: string_field(payload, &["picture", "avatar_url"]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_config() -> OAuthConfig {
        OAuthConfig {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            auth_url: "https://provider.test/authorize".to_string(),
            token_url: "https://provider.test/token".to_string(),
            userinfo_url: "https://provider.test/userinfo".to_string(),
            redirect_url: "https://app.test/api/auth/oauth/callback".to_string(),
        }
    }

    #[test]
    fn test_authorize_url_carries_state() {
        let client = OAuthClient::new(test_config());
        let url = client.authorize_url("xyzzy");
        assert!(url.starts_with("https://provider.test/authorize?"));
        assert!(url.contains("client_id=client"));
        assert!(url.contains("state=xyzzy"));
    }

    #[test]
    fn test_parse_oidc_identity() {
        let identity = parse_identity(&json!({
            "sub": "abc-123",
            "preferred_username": "alice",
            "email": "alice@example.com",
            "picture": "https://cdn.test/alice.png"
        }))
        .unwrap();
        assert_eq!(identity.subject, "abc-123");
        assert_eq!(identity.username.as_deref(), Some("alice"));
        assert_eq!(identity.email.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn test_parse_github_style_identity() {
        // Numeric id plus `login` instead of `sub`/`preferred_username`.
        let identity = parse_identity(&json!({
            "id": 99,
            "login": "bob",
            "avatar_url": "https://cdn.test/bob.png"
        }))
        .unwrap();
        assert_eq!(identity.subject, "99");
        assert_eq!(identity.username.as_deref(), Some("bob"));
        assert_eq!(identity.avatar_url.as_deref(), Some("https://cdn.test/bob.png"));
    }

    #[test]
    fn test_identity_without_subject_is_rejected() {
        assert!(parse_identity(&json!({ "login": "nobody" })).is_err());
    }
}
