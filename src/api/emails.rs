use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MessageResponse, TestEmailRequest};
use crate::services::email::{EmailTemplate, MonthlySummaryData};

/// Canned payload for each template tag, so every variant can be eyeballed
/// in a real inbox without touching account data.
fn canned_template(tag: &str) -> Option<EmailTemplate> {
    let username = "Test User".to_string();

    let template = match tag {
        "welcome" => EmailTemplate::Welcome { username },
        "currencyUpdate" => EmailTemplate::CurrencyUpdate {
            username,
            old_currency: "USD".to_string(),
            new_currency: "INR".to_string(),
            symbol: "₹".to_string(),
        },
        "twoFactorEnabled" => EmailTemplate::TwoFactorEnabled { username },
        "passwordReset" => EmailTemplate::PasswordReset { username },
        "profileUpdate" => EmailTemplate::ProfileUpdate {
            username,
            updated_fields: vec!["Email Address".to_string(), "Username".to_string()],
        },
        "monthlySummary" => EmailTemplate::MonthlySummary {
            username,
            data: MonthlySummaryData {
                month: "December".to_string(),
                year: 2024,
                currency: "INR".to_string(),
                total_income: 5000.0,
                total_expenses: 3500.0,
                balance: 1500.0,
                transaction_count: 25,
                highest_expense: 500.0,
                top_category: "Food".to_string(),
            },
        },
        "securityAlert" => EmailTemplate::SecurityAlert {
            username,
            alert_type: "Suspicious Login Attempt".to_string(),
            details: "Someone tried to access your account from an unrecognized device."
                .to_string(),
        },
        _ => return None,
    };

    Some(template)
}

/// POST /api/v1/emails/test-email
///
/// Renders any template from its type tag and sends it to the given
/// address. Delivery is awaited so SMTP problems surface here.
pub async fn test_email(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TestEmailRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let (Some(email), Some(template_type)) = (
        payload.email.as_deref().filter(|s| !s.is_empty()),
        payload.template_type.as_deref().filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::validation("Email and type are required"));
    };

    let template = canned_template(template_type)
        .ok_or_else(|| ApiError::validation(format!("Unknown email type: {template_type}")))?;

    state
        .mailer()
        .send(email, &template)
        .await
        .map_err(|e| ApiError::EmailDelivery(format!("Failed to send test email: {e}")))?;

    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "Test email sent successfully to {email}"
    )))))
}

/// POST /api/v1/emails/trigger-monthly-summary
///
/// Kicks off the batch in the background and returns at once. A full run
/// sleeps between accounts, so holding the request open is not an option.
pub async fn trigger_monthly_summary(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<MessageResponse>> {
    let summary = state.summary_service().clone();
    tokio::spawn(async move {
        if let Err(e) = summary.run().await {
            tracing::error!(error = %e, "Monthly summary batch failed");
        }
    });

    Json(ApiResponse::success(MessageResponse::new(
        "Monthly summary process triggered successfully",
    )))
}
