//! User profile models

use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;

pub const REFERRAL_CODE_LEN: usize = 8;

// No 0/O or 1/I so codes survive being read aloud
const REFERRAL_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Stored user profile
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub referral_code: String,
    pub referred_by: Option<String>,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile together with the codes of users it referred
#[derive(Debug, Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub referrals: Vec<String>,
}

/// Create-or-update payload for the caller's profile
#[derive(Debug, Deserialize, Validate)]
pub struct SaveProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    /// Only honoured when the profile is first created
    pub referred_by: Option<String>,
}

impl SaveProfileRequest {
    /// Trim names and email, upper-case the referral code and drop it if blank
    pub fn normalized(self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            referred_by: self
                .referred_by
                .map(|code| code.trim().to_uppercase())
                .filter(|code| !code.is_empty()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Unknown referral code: {0}")]
    UnknownReferralCode(String),

    #[error("Could not allocate a unique referral code")]
    ReferralCodesExhausted,

    #[error("Profile not found")]
    NotFound,
}

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::UnknownReferralCode(_) => ApiError::BadRequest(err.to_string()),
            ProfileError::ReferralCodesExhausted => ApiError::ServiceUnavailable(err.to_string()),
            ProfileError::NotFound => ApiError::NotFound(err.to_string()),
        }
    }
}

pub fn generate_referral_code() -> String {
    let mut rng = rand::thread_rng();
    (0..REFERRAL_CODE_LEN)
        .map(|_| REFERRAL_CODE_ALPHABET[rng.gen_range(0..REFERRAL_CODE_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str) -> SaveProfileRequest {
        SaveProfileRequest {
            first_name: " Ayesha ".to_string(),
            last_name: "Khan".to_string(),
            email: email.to_string(),
            referred_by: Some("  ab12cd34 ".to_string()),
        }
    }

    #[test]
    fn test_referral_code_shape() {
        for _ in 0..50 {
            let code = generate_referral_code();
            assert_eq!(code.len(), REFERRAL_CODE_LEN);
            assert!(code.bytes().all(|b| REFERRAL_CODE_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_normalized() {
        let req = request(" ayesha@example.com ").normalized();
        assert_eq!(req.first_name, "Ayesha");
        assert_eq!(req.email, "ayesha@example.com");
        assert_eq!(req.referred_by.as_deref(), Some("AB12CD34"));

        let mut blank = request("a@b.co");
        blank.referred_by = Some("   ".to_string());
        assert_eq!(blank.normalized().referred_by, None);
    }

    #[test]
    fn test_validation() {
        assert!(request("ayesha@example.com").normalized().validate().is_ok());
        assert!(request("not-an-email").normalized().validate().is_err());

        let mut req = request("ayesha@example.com");
        req.last_name = "   ".to_string();
        assert!(req.normalized().validate().is_err());
    }

    #[test]
    fn test_profile_error_mapping() {
        let err: ApiError = ProfileError::UnknownReferralCode("ZZZZZZZZ".to_string()).into();
        assert_eq!(err.error_code(), "BAD_REQUEST");
        let err: ApiError = ProfileError::NotFound.into();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }
}
