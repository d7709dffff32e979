use serde::{Deserialize, Serialize};

use crate::db::Account;
use crate::entities::{expenses, incomes};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Failure payload that still carries data. The unverified-login branch
    /// returns the account alongside the error so the client can route to
    /// the verification screen.
    pub fn error_with_data(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Some(data),
            error: Some(message.into()),
        }
    }
}

/// The account shape every user-facing endpoint returns. Secrets and
/// internal timestamps never leave the service layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub verified: bool,
    pub currency: String,
    pub country: String,
    pub two_factor_enabled: bool,
}

impl From<Account> for UserSummary {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            verified: account.verified,
            currency: account.currency,
            country: account.country,
            two_factor_enabled: account.two_factor_enabled,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub message: String,
    pub user: UserSummary,
}

/// Login response when the account has 2FA enabled. No session is issued
/// yet; the client must come back through the 2FA verify endpoint.
#[derive(Debug, Serialize)]
pub struct TwoFactorChallenge {
    pub message: String,
    #[serde(rename = "requires2FA")]
    pub requires_2fa: bool,
    pub email: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorSetupResponse {
    pub message: String,
    pub qr_code: String,
    pub secret: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorEnableResponse {
    pub message: String,
    pub backup_codes: Vec<String>,
    pub warning: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorStatusResponse {
    pub two_factor_enabled: bool,
    pub has_backup_codes: bool,
    pub remaining_backup_codes: u64,
}

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCurrencyRequest {
    pub currency: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: Option<String>,
    pub otp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TwoFactorTokenRequest {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TwoFactorDisableRequest {
    pub token: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorVerifyRequest {
    pub email: Option<String>,
    pub token: Option<String>,
    #[serde(default)]
    pub is_backup_code: bool,
}

#[derive(Debug, Deserialize)]
pub struct TestEmailRequest {
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub template_type: Option<String>,
}

// ============================================================================
// Ledger
// ============================================================================

#[derive(Debug, Serialize)]
pub struct LedgerEntryDto {
    pub id: i32,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: String,
}

impl From<incomes::Model> for LedgerEntryDto {
    fn from(model: incomes::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            amount: model.amount,
            category: model.category,
            date: model.date,
        }
    }
}

impl From<expenses::Model> for LedgerEntryDto {
    fn from(model: expenses::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            amount: model.amount,
            category: model.category,
            date: model.date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LedgerEntryRequest {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<String>,
}
