//! JWT authentication for API access.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Platform-level user roles for authorization.
///
/// A token's role claim is a hint only; privileged endpoints re-check the
/// role against the store before acting on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UserRole {
    /// Regular account - can browse and submit ratings.
    #[default]
    User,
    /// Administrator - manages trader records and user accounts.
    Admin,
}

impl UserRole {
    /// Check if this role can manage trader records and users.
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// JWT claims payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Username at issuance time.
    pub username: String,
    /// User's role at issuance time.
    pub role: UserRole,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
    /// JWT ID (unique identifier for this token).
    pub jti: String,
}

impl Claims {
    /// Create new claims for a user.
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        role: UserRole,
        expiry_hours: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.into(),
            username: username.into(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(expiry_hours)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Check if the token is expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Configuration for JWT authentication.
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Token expiry duration in hours.
    pub expiry_hours: i64,
    /// Issuer claim.
    pub issuer: Option<String>,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            expiry_hours: 24,
            issuer: None,
        }
    }
}

/// JWT authentication handler.
pub struct JwtAuth {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
    validation: Validation,
}

impl JwtAuth {
    /// Create a new JWT authenticator.
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::default();
        if let Some(ref iss) = config.issuer {
            validation.set_issuer(&[iss]);
        }

        Self {
            encoding_key,
            decoding_key,
            config,
            validation,
        }
    }

    /// Create a new token for a user.
    pub fn create_token(&self, user_id: &str, username: &str, role: UserRole) -> Result<String> {
        let claims = Claims::new(user_id, username, role, self.config.expiry_hours);
        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_auth() -> JwtAuth {
        JwtAuth::new(JwtConfig {
            secret: "test-secret-key-12345".to_string(),
            expiry_hours: 1,
            ..Default::default()
        })
    }

    #[test]
    fn test_create_and_validate_token() {
        let auth = create_test_auth();

        let token = auth.create_token("user123", "alice", UserRole::User).unwrap();
        let claims = auth.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, UserRole::User);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let auth = create_test_auth();
        let other = JwtAuth::new(JwtConfig {
            secret: "a-different-secret".to_string(),
            expiry_hours: 1,
            ..Default::default()
        });

        let token = other.create_token("user123", "alice", UserRole::Admin).unwrap();
        assert!(auth.validate_token(&token).is_err());
    }

    #[test]
    fn test_role_helpers() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::User.is_admin());
        assert_eq!(UserRole::default(), UserRole::User);
    }

    #[test]
    fn test_tokens_have_unique_ids() {
        let auth = create_test_auth();
        let a = auth.create_token("u", "alice", UserRole::User).unwrap();
        let b = auth.create_token("u", "alice", UserRole::User).unwrap();
        let ca = auth.validate_token(&a).unwrap();
        let cb = auth.validate_token(&b).unwrap();
        assert_ne!(ca.jti, cb.jti);
    }
}
