//! Domain service for the 2FA lifecycle: setup, enable, disable, and the
//! second step of a two-factor login.

use serde::Serialize;
use thiserror::Error;

use crate::db::Account;
use crate::services::two_factor::TotpSetup;

/// Errors specific to 2FA operations.
///
/// Display strings double as the user-facing messages surfaced by the HTTP
/// layer.
#[derive(Debug, Error)]
pub enum TwoFactorError {
    #[error("User not found!")]
    NotFound,

    #[error("2FA is already enabled for this account!")]
    AlreadyEnabled,

    #[error("2FA setup not initiated. Please setup 2FA first!")]
    SetupNotInitiated,

    #[error("Invalid 2FA token. Please try again!")]
    InvalidSetupToken,

    #[error("Invalid 2FA token!")]
    InvalidToken,

    #[error("Invalid password!")]
    InvalidPassword,

    #[error("2FA is not enabled for this account!")]
    NotEnabled,

    #[error("Invalid backup code!")]
    InvalidBackupCode,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for TwoFactorError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for TwoFactorError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Snapshot of an account's 2FA enrollment.
#[derive(Debug, Clone, Serialize)]
pub struct TwoFactorStatus {
    pub enabled: bool,
    pub has_backup_codes: bool,
    pub remaining_backup_codes: u64,
}

/// Domain service trait for two-factor authentication.
#[async_trait::async_trait]
pub trait TwoFactorService: Send + Sync {
    /// Starts enrollment: generates a secret, stores it in the pending
    /// state, and returns it with the provisioning QR code.
    ///
    /// # Errors
    ///
    /// Returns [`TwoFactorError::AlreadyEnabled`] when 2FA is active, and
    /// an internal error when the QR image cannot be rendered (enrollment
    /// cannot proceed without it).
    async fn setup(&self, account_id: i32) -> Result<TotpSetup, TwoFactorError>;

    /// Confirms enrollment with a current authenticator code. Flips the
    /// account to enabled and returns a fresh set of backup codes,
    /// replacing any earlier set.
    async fn enable(&self, account_id: i32, token: &str) -> Result<Vec<String>, TwoFactorError>;

    /// Turns 2FA off. Requires the account password and a currently valid
    /// authenticator code; clears the secret and all backup codes.
    async fn disable(
        &self,
        account_id: i32,
        token: &str,
        password: &str,
    ) -> Result<(), TwoFactorError>;

    /// Completes a two-factor login with either an authenticator code or a
    /// single-use backup code. A matched backup code is consumed even
    /// though the caller still has to issue the session.
    async fn verify_login(
        &self,
        email: &str,
        token: &str,
        is_backup_code: bool,
    ) -> Result<Account, TwoFactorError>;

    /// Reports whether 2FA is on and how many backup codes remain.
    async fn status(&self, account_id: i32) -> Result<TwoFactorStatus, TwoFactorError>;
}
