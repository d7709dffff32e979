use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::session_account_id;
use super::{ApiError, ApiResponse, AppState, LedgerEntryDto, LedgerEntryRequest, MessageResponse};
use crate::db::{LedgerPatch, NewLedgerEntry};

fn validate_amount(amount: f64) -> Result<(), ApiError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(ApiError::validation("Amount must be a positive number!"))
    }
}

fn validate_date(date: &str) -> Result<(), ApiError> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ApiError::validation("Date must be in YYYY-MM-DD format!"))
}

fn new_entry(payload: LedgerEntryRequest) -> Result<NewLedgerEntry, ApiError> {
    let (Some(title), Some(amount), Some(category), Some(date)) = (
        payload.title.filter(|s| !s.is_empty()),
        payload.amount,
        payload.category.filter(|s| !s.is_empty()),
        payload.date.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::validation("All fields are required!"));
    };

    validate_amount(amount)?;
    validate_date(&date)?;

    Ok(NewLedgerEntry {
        title,
        amount,
        category,
        date,
    })
}

fn patch_entry(payload: LedgerEntryRequest) -> Result<LedgerPatch, ApiError> {
    let patch = LedgerPatch {
        title: payload.title.filter(|s| !s.is_empty()),
        amount: payload.amount,
        category: payload.category.filter(|s| !s.is_empty()),
        date: payload.date.filter(|s| !s.is_empty()),
    };

    if patch.title.is_none()
        && patch.amount.is_none()
        && patch.category.is_none()
        && patch.date.is_none()
    {
        return Err(ApiError::validation(
            "At least one field is required for update!",
        ));
    }

    if let Some(amount) = patch.amount {
        validate_amount(amount)?;
    }
    if let Some(date) = patch.date.as_deref() {
        validate_date(date)?;
    }

    Ok(patch)
}

// ============================================================================
// Incomes
// ============================================================================

/// GET /api/v1/incomes
pub async fn list_incomes(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<Vec<LedgerEntryDto>>>, ApiError> {
    let account_id = session_account_id(&session).await?;

    let rows = state.store().list_incomes(account_id).await?;
    let incomes = rows.into_iter().map(LedgerEntryDto::from).collect();

    Ok(Json(ApiResponse::success(incomes)))
}

/// POST /api/v1/incomes
pub async fn add_income(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LedgerEntryRequest>,
) -> Result<Json<ApiResponse<LedgerEntryDto>>, ApiError> {
    let account_id = session_account_id(&session).await?;
    let entry = new_entry(payload)?;

    let row = state.store().add_income(account_id, entry).await?;

    Ok(Json(ApiResponse::success(row.into())))
}

/// PUT /api/v1/incomes/{id}
pub async fn update_income(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(income_id): Path<i32>,
    Json(payload): Json<LedgerEntryRequest>,
) -> Result<Json<ApiResponse<LedgerEntryDto>>, ApiError> {
    let account_id = session_account_id(&session).await?;
    let patch = patch_entry(payload)?;

    let row = state
        .store()
        .update_income(account_id, income_id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("Income not found!".to_string()))?;

    Ok(Json(ApiResponse::success(row.into())))
}

/// DELETE /api/v1/incomes/{id}
pub async fn delete_income(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(income_id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let account_id = session_account_id(&session).await?;

    let deleted = state.store().delete_income(account_id, income_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Income not found!".to_string()));
    }

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Income deleted successfully!",
    ))))
}

// ============================================================================
// Expenses
// ============================================================================

/// GET /api/v1/expenses
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<Vec<LedgerEntryDto>>>, ApiError> {
    let account_id = session_account_id(&session).await?;

    let rows = state.store().list_expenses(account_id).await?;
    let expenses = rows.into_iter().map(LedgerEntryDto::from).collect();

    Ok(Json(ApiResponse::success(expenses)))
}

/// POST /api/v1/expenses
pub async fn add_expense(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LedgerEntryRequest>,
) -> Result<Json<ApiResponse<LedgerEntryDto>>, ApiError> {
    let account_id = session_account_id(&session).await?;
    let entry = new_entry(payload)?;

    let row = state.store().add_expense(account_id, entry).await?;

    Ok(Json(ApiResponse::success(row.into())))
}

/// PUT /api/v1/expenses/{id}
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(expense_id): Path<i32>,
    Json(payload): Json<LedgerEntryRequest>,
) -> Result<Json<ApiResponse<LedgerEntryDto>>, ApiError> {
    let account_id = session_account_id(&session).await?;
    let patch = patch_entry(payload)?;

    let row = state
        .store()
        .update_expense(account_id, expense_id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("Expense not found!".to_string()))?;

    Ok(Json(ApiResponse::success(row.into())))
}

/// DELETE /api/v1/expenses/{id}
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(expense_id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let account_id = session_account_id(&session).await?;

    let deleted = state.store().delete_expense(account_id, expense_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Expense not found!".to_string()));
    }

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Expense deleted successfully!",
    ))))
}
