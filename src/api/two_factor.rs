use axum::{Json, extract::State};
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::{SESSION_USER_KEY, session_account_id};
use super::{
    ApiError, ApiResponse, AppState, MessageResponse, TwoFactorDisableRequest,
    TwoFactorEnableResponse, TwoFactorSetupResponse, TwoFactorStatusResponse,
    TwoFactorTokenRequest, TwoFactorVerifyRequest, UserResponse,
};

fn present(field: Option<&str>) -> Option<&str> {
    field.filter(|s| !s.is_empty())
}

/// POST /api/v1/users/2fa/setup
pub async fn setup(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<TwoFactorSetupResponse>>, ApiError> {
    let account_id = session_account_id(&session).await?;

    let setup = state.two_factor_service().setup(account_id).await?;

    Ok(Json(ApiResponse::success(TwoFactorSetupResponse {
        message: "2FA setup initiated. Please scan the QR code with your authenticator app."
            .to_string(),
        qr_code: setup.qr_code,
        secret: setup.secret,
    })))
}

/// POST /api/v1/users/2fa/enable
pub async fn enable(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<TwoFactorTokenRequest>,
) -> Result<Json<ApiResponse<TwoFactorEnableResponse>>, ApiError> {
    let account_id = session_account_id(&session).await?;

    let Some(token) = present(payload.token.as_deref()) else {
        return Err(ApiError::validation("2FA token is required!"));
    };

    let backup_codes = state
        .two_factor_service()
        .enable(account_id, token)
        .await?;

    Ok(Json(ApiResponse::success(TwoFactorEnableResponse {
        message: "2FA has been successfully enabled!".to_string(),
        backup_codes,
        warning: "Please save these backup codes in a safe place. You won't be able to see them again!".to_string(),
    })))
}

/// POST /api/v1/users/2fa/disable
pub async fn disable(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<TwoFactorDisableRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let account_id = session_account_id(&session).await?;

    let (Some(token), Some(password)) = (
        present(payload.token.as_deref()),
        present(payload.password.as_deref()),
    ) else {
        return Err(ApiError::validation("2FA token and password are required!"));
    };

    state
        .two_factor_service()
        .disable(account_id, token, password)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "2FA has been successfully disabled!",
    ))))
}

/// POST /api/v1/users/2fa/verify
///
/// Completes a login that stopped at the 2FA challenge. Public route; the
/// session is only issued once the code checks out.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<TwoFactorVerifyRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let (Some(email), Some(token)) = (
        present(payload.email.as_deref()),
        present(payload.token.as_deref()),
    ) else {
        return Err(ApiError::validation("Email and token are required!"));
    };

    let account = state
        .two_factor_service()
        .verify_login(email, token, payload.is_backup_code)
        .await?;

    session
        .insert(SESSION_USER_KEY, account.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    Ok(Json(ApiResponse::success(UserResponse {
        message: "2FA verification successful!".to_string(),
        user: account.into(),
    })))
}

/// GET /api/v1/users/2fa/status
pub async fn status(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<TwoFactorStatusResponse>>, ApiError> {
    let account_id = session_account_id(&session).await?;

    let status = state.two_factor_service().status(account_id).await?;

    Ok(Json(ApiResponse::success(TwoFactorStatusResponse {
        two_factor_enabled: status.enabled,
        has_backup_codes: status.has_backup_codes,
        remaining_backup_codes: status.remaining_backup_codes,
    })))
}
