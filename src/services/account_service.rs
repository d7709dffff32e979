//! Domain service for account registration, login, and profile management.
//!
//! Owns the login decision tree and the notification side effects of
//! profile, currency, and password changes. Session issuance stays in the
//! HTTP layer.

use thiserror::Error;

use crate::db::Account;

/// Errors specific to account operations.
///
/// Display strings double as the user-facing messages surfaced by the HTTP
/// layer, so wording changes here change the wire responses.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Email is already Registered. Please login instead!")]
    EmailRegistered,

    #[error("Username is already taken!")]
    UsernameTaken,

    #[error("User not found!")]
    NotFound,

    #[error("At least one field is required for update!")]
    NoFieldsProvided,

    #[error("No changes detected!")]
    NoChanges,

    #[error("Email is already in use. Please choose a different email address!")]
    EmailInUse,

    #[error("Currency is required!")]
    CurrencyRequired,

    #[error("Invalid currency code!")]
    UnsupportedCurrency,

    #[error("New password cannot be same as old!")]
    PasswordUnchanged,

    #[error("Invalid old password!")]
    InvalidOldPassword,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AccountError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Outcome of a credential login attempt.
///
/// Only [`LoginOutcome::Success`] permits issuing a session. The branches
/// that carry an [`Account`] do so because their responses include the
/// account summary.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// No account exists for the email.
    NotRegistered,
    /// Account exists but the email was never verified; checked before the
    /// password so the client can route straight to the verification flow.
    Unverified(Account),
    /// Password comparison failed.
    InvalidCredentials,
    /// Credentials are valid but a second factor must be presented before a
    /// session is issued.
    RequiresTwoFactor(Account),
    /// Credentials are valid and no second factor is configured.
    Success(Account),
}

/// Domain service trait for account management.
#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Registers a new account with default currency settings and sends a
    /// best-effort welcome email.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::EmailRegistered`] or
    /// [`AccountError::UsernameTaken`] when either identifier is in use.
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, AccountError>;

    /// Checks credentials and classifies the attempt.
    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AccountError>;

    /// Fetches the account behind a session.
    async fn get_profile(&self, account_id: i32) -> Result<Account, AccountError>;

    /// Applies username/email changes. Provided fields equal to the stored
    /// values count as unchanged; if nothing changes the update is
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::EmailInUse`] when the new email belongs to
    /// another account.
    async fn update_profile(
        &self,
        account_id: i32,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Account, AccountError>;

    /// Switches the preferred currency, deriving it from the country when
    /// no explicit code is given.
    async fn update_currency(
        &self,
        account_id: i32,
        currency: Option<&str>,
        country: Option<&str>,
    ) -> Result<Account, AccountError>;

    /// Replaces the password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidOldPassword`] if the current password
    /// does not match.
    async fn reset_password(
        &self,
        account_id: i32,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AccountError>;
}
