//! Domain service for email-verification one-time passcodes.
//!
//! Issuing a code invalidates every earlier code for the account; the
//! resend cooldown is tracked separately so it survives that purge.

use thiserror::Error;

use crate::db::Account;

/// Errors specific to OTP operations.
///
/// Display strings double as the user-facing messages surfaced by the HTTP
/// layer.
#[derive(Debug, Error)]
pub enum OtpError {
    #[error("Email is not registered!")]
    NotRegistered,

    #[error("User not found!")]
    NotFound,

    #[error("Please wait for atleast 1 minute before requesting another OTP.")]
    Cooldown,

    #[error("Email is already verified!")]
    AlreadyVerified,

    #[error("No valid OTP found. Please request a new OTP.")]
    NoActiveCode,

    #[error("OTP has expired!")]
    Expired,

    #[error("Invalid OTP. Please check your inbox!")]
    InvalidCode,

    #[error("{0}")]
    Validation(String),

    #[error("Failed to send OTP email: {0}")]
    Delivery(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for OtpError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for OtpError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for issuing and verifying email OTPs.
#[async_trait::async_trait]
pub trait OtpService: Send + Sync {
    /// Issues a fresh code for the account behind `email` and delivers it.
    ///
    /// All previously issued codes are invalidated first. The cooldown
    /// timestamp is only advanced after a successful delivery, so a failed
    /// send does not lock the account out of retrying.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::Cooldown`] when called again within the resend
    /// window, and [`OtpError::Delivery`] when the email cannot be sent.
    async fn issue(&self, email: &str) -> Result<(), OtpError>;

    /// Verifies a submitted code and marks the account verified.
    ///
    /// An expired code purges every stored code for the account; a
    /// mismatched code leaves them in place so the user can retry.
    async fn verify(&self, email: &str, code: &str) -> Result<Account, OtpError>;
}
