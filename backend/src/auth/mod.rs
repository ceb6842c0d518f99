//! Bearer token authentication for Planvest
//!
//! HS256 JWTs carrying the caller's user id and role.

mod jwt;

pub use jwt::{generate_token, verify_token, Claims, JwtError};

/// HS256 secret shared with the identity provider
#[derive(Clone)]
pub struct JwtSecret(pub std::sync::Arc<str>);

impl JwtSecret {
    pub fn new(secret: &str) -> Self {
        Self(secret.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
