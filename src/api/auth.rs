use axum::{extract::Request, middleware::Next, response::IntoResponse};
use tower_sessions::Session;

use super::ApiError;

/// Session key holding the signed-in account id.
pub const SESSION_USER_KEY: &str = "user";

/// Gate for everything behind a login. The session cookie is the only
/// accepted credential; there is no API-key path.
pub async fn auth_middleware(
    session: Session,
    request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    if let Ok(Some(account_id)) = session.get::<i32>(SESSION_USER_KEY).await {
        tracing::Span::current().record("user_id", account_id);
        return Ok(next.run(request).await);
    }

    Err(ApiError::unauthorized("Not authorized. Please log in!"))
}

/// Account id from the session, for handlers behind [`auth_middleware`].
pub async fn session_account_id(session: &Session) -> Result<i32, ApiError> {
    session
        .get::<i32>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .ok_or_else(|| ApiError::unauthorized("Not authorized. Please log in!"))
}
