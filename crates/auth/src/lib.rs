//! Authentication
//!
//! JWT issuance and validation, password hashing, and the OAuth code
//! exchange. Local login and OAuth both converge on the same [`Claims`]
//! shape, so downstream authorization never cares how a user signed in.

pub mod jwt;
pub mod oauth;
pub mod password;

pub use jwt::{Claims, JwtAuth, JwtConfig, UserRole};
pub use oauth::{OAuthClient, OAuthConfig, OAuthError, OAuthIdentity};
pub use password::{hash_password, verify_password};
