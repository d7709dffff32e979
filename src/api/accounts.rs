use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::{SESSION_USER_KEY, session_account_id};
use super::{
    ApiError, ApiResponse, AppState, LoginRequest, MessageResponse, RegisterRequest,
    ResetPasswordRequest, TwoFactorChallenge, UpdateCurrencyRequest, UpdateProfileRequest,
    UserResponse, UserSummary,
};
use crate::services::{AccountError, LoginOutcome};

/// Treats empty strings like absent fields. Clients send empty inputs for
/// untouched form fields and the presence checks must not count those.
fn present(field: Option<&str>) -> Option<&str> {
    field.filter(|s| !s.is_empty())
}

/// POST /api/v1/users
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let account = state
        .account_service()
        .register(
            payload.username.as_deref().unwrap_or_default(),
            payload.email.as_deref().unwrap_or_default(),
            payload.password.as_deref().unwrap_or_default(),
        )
        .await?;

    session
        .insert(SESSION_USER_KEY, account.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    Ok(Json(ApiResponse::success(UserResponse {
        message: "User registered successfully. Please verify your email!".to_string(),
        user: account.into(),
    })))
}

/// POST /api/v1/users/login
///
/// Five outcomes share this endpoint: unknown email, unverified account,
/// wrong password, a 2FA challenge, and a full login. Only the last one
/// issues a session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let outcome = state
        .account_service()
        .login(
            payload.email.as_deref().unwrap_or_default(),
            payload.password.as_deref().unwrap_or_default(),
        )
        .await?;

    let response = match outcome {
        LoginOutcome::NotRegistered => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<UserSummary>::error(
                "Email is not registered. Please register!",
            )),
        )
            .into_response(),
        LoginOutcome::Unverified(account) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error_with_data(
                UserSummary::from(account),
                "Email is not verified. Please verify your email via otp to proceed.",
            )),
        )
            .into_response(),
        LoginOutcome::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<UserSummary>::error("Invalid user credentials!")),
        )
            .into_response(),
        LoginOutcome::RequiresTwoFactor(account) => Json(ApiResponse::success(TwoFactorChallenge {
            message: "Please enter your 2FA code to complete login.".to_string(),
            requires_2fa: true,
            email: account.email.clone(),
            user: account.into(),
        }))
        .into_response(),
        LoginOutcome::Success(account) => {
            session
                .insert(SESSION_USER_KEY, account.id)
                .await
                .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

            Json(ApiResponse::success(UserResponse {
                message: "Logged In Successfully!".to_string(),
                user: account.into(),
            }))
            .into_response()
        }
    };

    Ok(response)
}

/// DELETE /api/v1/users/logout
///
/// Always succeeds, session or not.
pub async fn logout(session: Session) -> Json<ApiResponse<MessageResponse>> {
    let _ = session.flush().await;
    Json(ApiResponse::success(MessageResponse::new(
        "Logged Out Successfully!",
    )))
}

/// GET /api/v1/users
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let account_id = session_account_id(&session).await?;

    let account = state
        .account_service()
        .get_profile(account_id)
        .await
        .map_err(|e| match e {
            AccountError::NotFound => ApiError::NotFound("User Not Found!".to_string()),
            other => other.into(),
        })?;

    Ok(Json(ApiResponse::success(UserResponse {
        message: "User details retrieved successfully!".to_string(),
        user: account.into(),
    })))
}

/// PUT /api/v1/users
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let account_id = session_account_id(&session).await?;

    let account = state
        .account_service()
        .update_profile(
            account_id,
            present(payload.username.as_deref()),
            present(payload.email.as_deref()),
        )
        .await?;

    Ok(Json(ApiResponse::success(UserResponse {
        message: "Profile updated Successfully!".to_string(),
        user: account.into(),
    })))
}

/// PUT /api/v1/users/currency
pub async fn update_currency(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<UpdateCurrencyRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let account_id = session_account_id(&session).await?;

    let account = state
        .account_service()
        .update_currency(
            account_id,
            present(payload.currency.as_deref()),
            present(payload.country.as_deref()),
        )
        .await?;

    Ok(Json(ApiResponse::success(UserResponse {
        message: "Currency updated successfully!".to_string(),
        user: account.into(),
    })))
}

/// PUT /api/v1/users/reset-password
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let account_id = session_account_id(&session).await?;

    let (Some(old_password), Some(new_password)) = (
        present(payload.old_password.as_deref()),
        present(payload.new_password.as_deref()),
    ) else {
        return Err(ApiError::validation("Both fields are required for update!"));
    };

    state
        .account_service()
        .reset_password(account_id, old_password, new_password)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Password updated successfully!",
    ))))
}

