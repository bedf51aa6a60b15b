//! Application state shared across handlers.

use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::Arc;

use auth::{JwtAuth, JwtConfig, OAuthClient, OAuthConfig};
use kolscan::KolscanClient;

use crate::ServerConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: PgPool,
    /// JWT authentication handler.
    pub jwt_auth: Arc<JwtAuth>,
    /// OAuth client (None when the provider is not configured).
    pub oauth: Option<Arc<OAuthClient>>,
    /// Kolscan leaderboard client.
    pub kolscan: Arc<KolscanClient>,
    /// Directory uploaded profile images are written to.
    pub upload_dir: PathBuf,
}

impl AppState {
    /// Create a new application state.
    pub fn new(pool: PgPool, config: &ServerConfig) -> Self {
        let jwt_config = JwtConfig {
            secret: config.jwt_secret.clone(),
            expiry_hours: 24,
            issuer: None,
        };
        let jwt_auth = Arc::new(JwtAuth::new(jwt_config));

        let oauth = match OAuthConfig::from_env() {
            Some(oauth_config) => {
                tracing::info!("OAuth provider configured");
                Some(Arc::new(OAuthClient::new(oauth_config)))
            }
            None => {
                tracing::info!("OAuth provider not configured; OAuth endpoints disabled");
                None
            }
        };

        let kolscan = Arc::new(KolscanClient::from_env());

        Self {
            pool,
            jwt_auth,
            oauth,
            kolscan,
            upload_dir: PathBuf::from(&config.upload_dir),
        }
    }

    /// Create an Arc-wrapped state.
    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}
