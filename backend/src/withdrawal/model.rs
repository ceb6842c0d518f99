//! Withdrawal request models and validation rules

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::RequestStatus;

/// Mobile wallet the payout is sent to
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "payout_method", rename_all = "snake_case")]
#[serde(rename_all = "camelCase")]
pub enum PayoutMethod {
    Easypaisa,
    JazzCash,
}

/// Stored withdrawal request
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct WithdrawalRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_number: String,
    pub amount: i64,
    pub payout_method: PayoutMethod,
    pub status: RequestStatus,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for requesting a withdrawal
#[derive(Debug, Deserialize)]
pub struct SubmitWithdrawalRequest {
    pub account_number: String,
    pub amount: i64,
    pub payout_method: PayoutMethod,
}

#[derive(Debug, Serialize)]
pub struct WithdrawalEligibility {
    pub can_withdraw: bool,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WithdrawalError {
    #[error("Withdrawal amount must be positive")]
    NonPositiveAmount,

    #[error("Minimum withdrawal amount is {min}")]
    BelowMinimum { min: i64 },

    #[error("Maximum withdrawal amount is {max}")]
    AboveMaximum { max: i64 },

    #[error("Account number is required")]
    MissingAccountNumber,

    #[error("Insufficient balance: {available} available")]
    InsufficientBalance { available: i64 },
}

impl From<WithdrawalError> for ApiError {
    fn from(err: WithdrawalError) -> Self {
        match err {
            WithdrawalError::InsufficientBalance { .. } => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            _ => ApiError::ValidationError(err.to_string()),
        }
    }
}

/// Inclusive bounds on a single withdrawal
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct WithdrawalLimits {
    pub min: i64,
    pub max: i64,
}

impl WithdrawalLimits {
    /// Check amount and destination, in that order
    pub fn check(&self, amount: i64, account_number: &str) -> Result<(), WithdrawalError> {
        if amount <= 0 {
            return Err(WithdrawalError::NonPositiveAmount);
        }
        if amount < self.min {
            return Err(WithdrawalError::BelowMinimum { min: self.min });
        }
        if amount > self.max {
            return Err(WithdrawalError::AboveMaximum { max: self.max });
        }
        if account_number.trim().is_empty() {
            return Err(WithdrawalError::MissingAccountNumber);
        }
        Ok(())
    }

    /// A balance below the minimum cannot fund any withdrawal
    pub fn allows_withdrawal_from(&self, balance: i64) -> bool {
        balance >= self.min.max(1)
    }
}

pub fn ensure_covered(amount: i64, balance: i64) -> Result<(), WithdrawalError> {
    if amount > balance {
        return Err(WithdrawalError::InsufficientBalance { available: balance });
    }
    Ok(())
}
