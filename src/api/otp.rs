use axum::{Json, extract::State};
use std::sync::Arc;

use super::{
    ApiError, ApiResponse, AppState, MessageResponse, SendOtpRequest, UserResponse,
    VerifyOtpRequest,
};

/// POST /api/v1/users/send-otp
pub async fn send_otp(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SendOtpRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .otp_service()
        .issue(payload.email.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "OTP sent successfully. Please check your email!",
    ))))
}

/// POST /api/v1/users/verify-otp
pub async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let account = state
        .otp_service()
        .verify(
            payload.email.as_deref().unwrap_or_default(),
            payload.otp.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(ApiResponse::success(UserResponse {
        message: "Email has been verified successfully!".to_string(),
        user: account.into(),
    })))
}
