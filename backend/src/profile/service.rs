//! Profile service - creation, updates and balance bookkeeping

use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::profile::model::{
    generate_referral_code, ProfileError, ProfileView, SaveProfileRequest, UserProfile,
};

const MAX_REFERRAL_CODE_ATTEMPTS: usize = 5;
const REFERRAL_CODE_CONSTRAINT: &str = "user_profiles_referral_code_key";

#[derive(Clone)]
pub struct ProfileService {
    db_pool: PgPool,
}

impl ProfileService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    pub async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, ApiError> {
        let profile =
            sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.db_pool)
                .await?;

        Ok(profile)
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<UserProfile, ApiError> {
        self.find_profile(user_id)
            .await?
            .ok_or_else(|| ProfileError::NotFound.into())
    }

    pub async fn get_profile_view(&self, user_id: Uuid) -> Result<ProfileView, ApiError> {
        let profile = self.get_profile(user_id).await?;
        let referrals = self.referral_codes_of(&profile.referral_code).await?;
        Ok(ProfileView { profile, referrals })
    }

    /// Codes of the users who signed up with `referral_code`, oldest first
    pub async fn referral_codes_of(&self, referral_code: &str) -> Result<Vec<String>, ApiError> {
        let codes = sqlx::query_scalar::<_, String>(
            "SELECT referral_code FROM user_profiles WHERE referred_by = $1 ORDER BY created_at",
        )
        .bind(referral_code)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(codes)
    }

    /// Create the caller's profile, or update names and email if it exists
    pub async fn save_profile(
        &self,
        user_id: Uuid,
        request: SaveProfileRequest,
    ) -> Result<ProfileView, ApiError> {
        let request = request.normalized();
        request.validate()?;

        let profile = match self.find_profile(user_id).await? {
            Some(_) => self.update_profile(user_id, &request).await?,
            None => self.create_profile(user_id, &request).await?,
        };

        let referrals = self.referral_codes_of(&profile.referral_code).await?;
        Ok(ProfileView { profile, referrals })
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        request: &SaveProfileRequest,
    ) -> Result<UserProfile, ApiError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE user_profiles
            SET first_name = $1, last_name = $2, email = $3, updated_at = $4
            WHERE user_id = $5
            RETURNING *
            "#,
        )
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(Utc::now())
        .bind(user_id)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(user_id = %user_id, "Profile updated");
        Ok(profile)
    }

    async fn create_profile(
        &self,
        user_id: Uuid,
        request: &SaveProfileRequest,
    ) -> Result<UserProfile, ApiError> {
        // The referred_by foreign key is the existence check for the referrer
        for attempt in 1..=MAX_REFERRAL_CODE_ATTEMPTS {
            let referral_code = generate_referral_code();
            let now = Utc::now();

            let result = sqlx::query_as::<_, UserProfile>(
                r#"
                INSERT INTO user_profiles (
                    user_id, first_name, last_name, email, referral_code,
                    referred_by, balance, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, 0, $7, $7)
                RETURNING *
                "#,
            )
            .bind(user_id)
            .bind(&request.first_name)
            .bind(&request.last_name)
            .bind(&request.email)
            .bind(&referral_code)
            .bind(&request.referred_by)
            .bind(now)
            .fetch_one(&self.db_pool)
            .await;

            match result {
                Ok(profile) => {
                    tracing::info!(
                        user_id = %user_id,
                        referral_code = %profile.referral_code,
                        referred_by = ?profile.referred_by,
                        "Profile created"
                    );
                    return Ok(profile);
                }
                Err(sqlx::Error::Database(db))
                    if db.constraint() == Some(REFERRAL_CODE_CONSTRAINT) =>
                {
                    tracing::debug!(attempt, "Referral code collision, retrying");
                }
                Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                    let code = request.referred_by.clone().unwrap_or_default();
                    return Err(ProfileError::UnknownReferralCode(code).into());
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ProfileError::ReferralCodesExhausted.into())
    }
}

/// Lock the caller's profile row and read the balance
pub(crate) async fn lock_balance(conn: &mut PgConnection, user_id: Uuid) -> Result<i64, ApiError> {
    sqlx::query_scalar::<_, i64>("SELECT balance FROM user_profiles WHERE user_id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| ProfileError::NotFound.into())
}

/// Add `delta` (may be negative) to a balance and return the new value
pub(crate) async fn adjust_balance(
    conn: &mut PgConnection,
    user_id: Uuid,
    delta: i64,
) -> Result<i64, ApiError> {
    sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE user_profiles
        SET balance = balance + $1, updated_at = $2
        WHERE user_id = $3
        RETURNING balance
        "#,
    )
    .bind(delta)
    .bind(Utc::now())
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| ProfileError::NotFound.into())
}
