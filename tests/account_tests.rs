//! End-to-end tests for registration, login, profile management, and the
//! email verification flow.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use finmate::config::Config;
use finmate::db::repositories::account::hash_secret;
use http_body_util::BodyExt;
use tower::ServiceExt;

const PASSWORD: &str = "password123";

async fn spawn_app() -> (Arc<finmate::api::AppState>, Router) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // A second pooled connection would open its own empty in-memory
    // database, so the pool is pinned to one.
    config.general.max_db_connections = 1;
    // Keep hashing cheap so the suite stays fast.
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = finmate::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    let router = finmate::api::router(state.clone()).await;
    (state, router)
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_request_as(
    method: &str,
    uri: &str,
    cookie: &str,
    body: &serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Cookie", cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn bare_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("Cookie", cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// The session cookie from a response, ready to be sent back.
fn session_cookie(response: &Response) -> String {
    response
        .headers()
        .get("set-cookie")
        .expect("expected a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn read_json(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn register(app: &Router, username: &str, email: &str) -> Response {
    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users",
            &serde_json::json!({
                "username": username,
                "email": email,
                "password": PASSWORD,
            }),
        ))
        .await
        .unwrap()
}

/// Insert a known OTP for the account so its code is predictable. Issued
/// codes are random and only their hashes are stored, so tests seed their
/// own.
async fn seed_otp(state: &Arc<finmate::api::AppState>, email: &str, code: &str, ttl_minutes: i64) {
    let account = state
        .store()
        .get_account_by_email(email)
        .await
        .unwrap()
        .expect("account should exist");

    let code_hash = hash_secret(code, None).unwrap();
    let expires_at = (chrono::Utc::now() + chrono::Duration::minutes(ttl_minutes)).to_rfc3339();

    state.store().delete_otps(account.id).await.unwrap();
    state
        .store()
        .create_otp(account.id, &code_hash, &expires_at)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_register_validates_input() {
    let (_, app) = spawn_app().await;

    let cases = [
        (
            serde_json::json!({"username": "ab", "email": "a@example.com", "password": PASSWORD}),
            "Username must be between 3 and 20 characters!",
        ),
        (
            serde_json::json!({"username": "alice", "email": "not-an-email", "password": PASSWORD}),
            "Please provide a valid email address!",
        ),
        (
            serde_json::json!({"username": "alice", "email": "a@example.com", "password": "short"}),
            "Password must be at least 8 characters long!",
        ),
        (
            serde_json::json!({}),
            "Username must be between 3 and 20 characters!",
        ),
    ];

    for (payload, expected) in cases {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/v1/users", &payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], expected);
    }
}

#[tokio::test]
async fn test_register_issues_session_with_defaults() {
    let (_, app) = spawn_app().await;

    let response = register(&app, "alice", "alice@example.com").await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = session_cookie(&response);
    let body = read_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(
        body["data"]["message"],
        "User registered successfully. Please verify your email!"
    );
    assert_eq!(body["data"]["user"]["username"], "alice");
    assert_eq!(body["data"]["user"]["verified"], false);
    assert_eq!(body["data"]["user"]["currency"], "USD");
    assert_eq!(body["data"]["user"]["country"], "US");
    assert_eq!(body["data"]["user"]["twoFactorEnabled"], false);

    // The session from registration is immediately usable.
    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/users", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["data"]["message"], "User details retrieved successfully!");
    assert_eq!(body["data"]["user"]["email"], "alice@example.com");
}

#[tokio::test]
async fn test_register_rejects_duplicates() {
    let (_, app) = spawn_app().await;

    let response = register(&app, "alice", "alice@example.com").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = register(&app, "alice2", "alice@example.com").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Email is already Registered. Please login instead!");

    let response = register(&app, "alice", "other@example.com").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Username is already taken!");
}

#[tokio::test]
async fn test_login_branch_outcomes() {
    let (state, app) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/login",
            &serde_json::json!({"email": "ghost@example.com", "password": PASSWORD}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Email is not registered. Please register!");

    register(&app, "alice", "alice@example.com").await;

    // Unverified accounts are turned away before the password is checked,
    // and the response carries the account so the client can route to
    // verification.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/login",
            &serde_json::json!({"email": "alice@example.com", "password": PASSWORD}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(
        response.headers().get("set-cookie").is_none(),
        "a refused login must not issue a session"
    );
    let body = read_json(response).await;
    assert_eq!(
        body["error"],
        "Email is not verified. Please verify your email via otp to proceed."
    );
    assert_eq!(body["data"]["username"], "alice");

    let account = state
        .store()
        .get_account_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    state
        .store()
        .set_account_verified(account.id, true)
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/login",
            &serde_json::json!({"email": "alice@example.com", "password": "wrong-password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Invalid user credentials!");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/login",
            &serde_json::json!({"email": "alice@example.com", "password": PASSWORD}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    let body = read_json(response).await;
    assert_eq!(body["data"]["message"], "Logged In Successfully!");
    assert_eq!(body["data"]["user"]["verified"], true);

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/users", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_validates_credentials_shape() {
    let (_, app) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/users/login", &serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Please provide a valid email address!");
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let (_, app) = spawn_app().await;

    // Session checked in the handler.
    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/users", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Not authorized. Please log in!");

    // Session checked by the middleware.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/users/currency",
            &serde_json::json!({"currency": "EUR"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Not authorized. Please log in!");
}

#[tokio::test]
async fn test_logout_clears_session() {
    let (_, app) = spawn_app().await;

    // Logout is public and succeeds without a session.
    let response = app
        .clone()
        .oneshot(bare_request("DELETE", "/api/v1/users/logout", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["message"], "Logged Out Successfully!");

    let response = register(&app, "alice", "alice@example.com").await;
    let cookie = session_cookie(&response);

    let response = app
        .clone()
        .oneshot(bare_request("DELETE", "/api/v1/users/logout", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/users", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_profile_flow() {
    let (_, app) = spawn_app().await;

    let response = register(&app, "alice", "alice@example.com").await;
    let cookie = session_cookie(&response);
    register(&app, "bob", "bob@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/api/v1/users",
            &cookie,
            &serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "At least one field is required for update!");

    // Resubmitting the stored values counts as no change.
    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/api/v1/users",
            &cookie,
            &serde_json::json!({"username": "alice", "email": "alice@example.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "No changes detected!");

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/api/v1/users",
            &cookie,
            &serde_json::json!({"email": "bob@example.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(
        body["error"],
        "Email is already in use. Please choose a different email address!"
    );

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/api/v1/users",
            &cookie,
            &serde_json::json!({"username": "alice_writes"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["message"], "Profile updated Successfully!");
    assert_eq!(body["data"]["user"]["username"], "alice_writes");
    assert_eq!(body["data"]["user"]["email"], "alice@example.com");
}

#[tokio::test]
async fn test_update_currency_flow() {
    let (_, app) = spawn_app().await;

    let response = register(&app, "alice", "alice@example.com").await;
    let cookie = session_cookie(&response);

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/api/v1/users/currency",
            &cookie,
            &serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Currency is required!");

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/api/v1/users/currency",
            &cookie,
            &serde_json::json!({"currency": "XYZ"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Invalid currency code!");

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/api/v1/users/currency",
            &cookie,
            &serde_json::json!({"currency": "EUR"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["message"], "Currency updated successfully!");
    assert_eq!(body["data"]["user"]["currency"], "EUR");

    // Country alone resolves through the country-to-currency table.
    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/api/v1/users/currency",
            &cookie,
            &serde_json::json!({"country": "JP"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["user"]["currency"], "JPY");
    assert_eq!(body["data"]["user"]["country"], "JP");
}

#[tokio::test]
async fn test_reset_password_flow() {
    let (state, app) = spawn_app().await;

    let response = register(&app, "alice", "alice@example.com").await;
    let cookie = session_cookie(&response);

    let cases = [
        (
            serde_json::json!({"oldPassword": "", "newPassword": ""}),
            StatusCode::BAD_REQUEST,
            "Both fields are required for update!",
        ),
        (
            serde_json::json!({"oldPassword": PASSWORD, "newPassword": PASSWORD}),
            StatusCode::BAD_REQUEST,
            "New password cannot be same as old!",
        ),
        (
            serde_json::json!({"oldPassword": PASSWORD, "newPassword": "short"}),
            StatusCode::BAD_REQUEST,
            "Password must be at least 8 characters long!",
        ),
        (
            serde_json::json!({"oldPassword": "wrong-password", "newPassword": "fresh-password-1"}),
            StatusCode::UNAUTHORIZED,
            "Invalid old password!",
        ),
    ];

    for (payload, status, expected) in cases {
        let response = app
            .clone()
            .oneshot(json_request_as(
                "PUT",
                "/api/v1/users/reset-password",
                &cookie,
                &payload,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), status);
        let body = read_json(response).await;
        assert_eq!(body["error"], expected);
    }

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/api/v1/users/reset-password",
            &cookie,
            &serde_json::json!({"oldPassword": PASSWORD, "newPassword": "fresh-password-1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["message"], "Password updated successfully!");

    // The new password is the only one that logs in now.
    let account = state
        .store()
        .get_account_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    state
        .store()
        .set_account_verified(account.id, true)
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/login",
            &serde_json::json!({"email": "alice@example.com", "password": PASSWORD}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/login",
            &serde_json::json!({"email": "alice@example.com", "password": "fresh-password-1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_otp_send_and_verify_flow() {
    let (state, app) = spawn_app().await;

    register(&app, "bob", "bob@example.com").await;

    // No code has been issued yet.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/verify-otp",
            &serde_json::json!({"email": "bob@example.com", "otp": "123456"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "No valid OTP found. Please request a new OTP.");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/send-otp",
            &serde_json::json!({"email": "ghost@example.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Email is not registered!");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/send-otp",
            &serde_json::json!({"email": "bob@example.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(
        body["data"]["message"],
        "OTP sent successfully. Please check your email!"
    );

    // An immediate resend trips the cooldown.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/send-otp",
            &serde_json::json!({"email": "bob@example.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = read_json(response).await;
    assert_eq!(
        body["error"],
        "Please wait for atleast 1 minute before requesting another OTP."
    );

    // Issued codes never start with a zero, so this cannot match.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/verify-otp",
            &serde_json::json!({"email": "bob@example.com", "otp": "000000"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Invalid OTP. Please check your inbox!");

    seed_otp(&state, "bob@example.com", "654321", 5).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/verify-otp",
            &serde_json::json!({"email": "bob@example.com", "otp": "654321"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["message"], "Email has been verified successfully!");
    assert_eq!(body["data"]["user"]["verified"], true);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/verify-otp",
            &serde_json::json!({"email": "bob@example.com", "otp": "654321"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Email is already verified!");
}

#[tokio::test]
async fn test_expired_otp_purges_stored_codes() {
    let (state, app) = spawn_app().await;

    register(&app, "carol", "carol@example.com").await;
    seed_otp(&state, "carol@example.com", "222333", -1).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/verify-otp",
            &serde_json::json!({"email": "carol@example.com", "otp": "222333"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "OTP has expired!");

    // The expired attempt wiped the record, so even the right code is gone.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/verify-otp",
            &serde_json::json!({"email": "carol@example.com", "otp": "222333"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "No valid OTP found. Please request a new OTP.");
}

#[tokio::test]
async fn test_new_otp_invalidates_previous() {
    let (state, app) = spawn_app().await;

    register(&app, "erin", "erin@example.com").await;
    seed_otp(&state, "erin@example.com", "111222", 5).await;
    seed_otp(&state, "erin@example.com", "333444", 5).await;

    // The first code died when the second was issued.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/verify-otp",
            &serde_json::json!({"email": "erin@example.com", "otp": "111222"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Invalid OTP. Please check your inbox!");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/verify-otp",
            &serde_json::json!({"email": "erin@example.com", "otp": "333444"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["user"]["verified"], true);
}

#[tokio::test]
async fn test_otp_resend_allowed_after_cooldown() {
    use sea_orm::{ActiveModelTrait, Set};

    let (state, app) = spawn_app().await;

    register(&app, "frank", "frank@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/send-otp",
            &serde_json::json!({"email": "frank@example.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/send-otp",
            &serde_json::json!({"email": "frank@example.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // Backdate the send stamp past the cooldown window.
    let account = state
        .store()
        .get_account_by_email("frank@example.com")
        .await
        .unwrap()
        .unwrap();
    let stale = finmate::entities::otp_cooldowns::ActiveModel {
        account_id: Set(account.id),
        last_sent_at: Set((chrono::Utc::now() - chrono::Duration::seconds(61)).to_rfc3339()),
    };
    stale.update(&state.store().conn).await.unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/send-otp",
            &serde_json::json!({"email": "frank@example.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_verify_otp_rejects_malformed_codes() {
    let (_, app) = spawn_app().await;

    register(&app, "dave", "dave@example.com").await;

    for bad_code in ["12345", "1234567", "12345a", ""] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/users/verify-otp",
                &serde_json::json!({"email": "dave@example.com", "otp": bad_code}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"], "OTP must be a 6-digit code!");
    }
}
