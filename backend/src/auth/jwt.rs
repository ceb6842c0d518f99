//! Bearer token signing and verification
//!
//! Tokens are minted by the identity provider; this service only verifies them.
//! `generate_token` exists for operator tooling and tests.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::UserRole;

/// JWT-related errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Token decoding failed: {0}")]
    DecodingFailed(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// JWT claims carried by bearer tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// `user`, `admin` or `guest`
    pub role: String,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|e| JwtError::InvalidToken(e.to_string()))
    }

    pub fn user_role(&self) -> Result<UserRole, JwtError> {
        UserRole::parse(&self.role)
            .ok_or_else(|| JwtError::InvalidToken(format!("unknown role '{}'", self.role)))
    }
}

/// Sign an HS256 token for `user_id`
pub fn generate_token(
    user_id: Uuid,
    role: UserRole,
    secret: &str,
    ttl_seconds: i64,
) -> Result<String, JwtError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(ttl_seconds);

    let role = match role {
        UserRole::Admin => "admin",
        UserRole::User => "user",
        UserRole::Guest => "guest",
    };

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::EncodingFailed(e.to_string()))
}

/// Verify signature and expiry, then decode the claims
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        _ => JwtError::DecodingFailed(e.to_string()),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify() {
        let user_id = Uuid::new_v4();
        let token = generate_token(user_id, UserRole::User, "test-secret-key", 900).unwrap();

        let claims = verify_token(&token, "test-secret-key").unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.user_role().unwrap(), UserRole::User);
    }

    #[test]
    fn test_invalid_token() {
        assert!(verify_token("invalid.token.here", "test-secret-key").is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let token = generate_token(Uuid::new_v4(), UserRole::Admin, "secret1", 900).unwrap();
        assert!(verify_token(&token, "secret2").is_err());
    }

    #[test]
    fn test_expired_token() {
        // Beyond the default 60s leeway
        let token = generate_token(Uuid::new_v4(), UserRole::User, "secret", -3600).unwrap();
        assert!(matches!(
            verify_token(&token, "secret"),
            Err(JwtError::TokenExpired)
        ));
    }

    #[test]
    fn test_unknown_role() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            role: "oracle".to_string(),
            iat: 0,
            exp: 0,
        };
        assert!(claims.user_role().is_err());

        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            role: "user".to_string(),
            iat: 0,
            exp: 0,
        };
        assert!(claims.user_id().is_err());
    }
}
