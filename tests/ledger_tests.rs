//! End-to-end tests for the income and expense ledgers.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use finmate::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn spawn_app() -> Router {
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
    finmate::api::router(state).await
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

async fn read_json(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Register an account and return its session cookie. Ledger routes only
/// need a session, not a verified email.
async fn register(app: &Router, username: &str, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users",
            &serde_json::json!({
                "username": username,
                "email": email,
                "password": "password123",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

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

#[tokio::test]
async fn test_ledger_requires_session() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/incomes", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Not authorized. Please log in!");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/expenses",
            &serde_json::json!({"title": "Rent", "amount": 1200, "category": "Housing", "date": "2024-01-01"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_income_validation() {
    let app = spawn_app().await;
    let cookie = register(&app, "alice", "alice@example.com").await;

    let cases = [
        (
            serde_json::json!({"title": "Salary", "amount": 5000}),
            "All fields are required!",
        ),
        (
            serde_json::json!({"title": "", "amount": 5000, "category": "Job", "date": "2024-01-15"}),
            "All fields are required!",
        ),
        (
            serde_json::json!({"title": "Salary", "amount": -5000, "category": "Job", "date": "2024-01-15"}),
            "Amount must be a positive number!",
        ),
        (
            serde_json::json!({"title": "Salary", "amount": 0, "category": "Job", "date": "2024-01-15"}),
            "Amount must be a positive number!",
        ),
        (
            serde_json::json!({"title": "Salary", "amount": 5000, "category": "Job", "date": "15-01-2024"}),
            "Date must be in YYYY-MM-DD format!",
        ),
        (
            serde_json::json!({"title": "Salary", "amount": 5000, "category": "Job", "date": "2024-02-30"}),
            "Date must be in YYYY-MM-DD format!",
        ),
    ];

    for (payload, expected) in cases {
        let response = app
            .clone()
            .oneshot(json_request_as("POST", "/api/v1/incomes", &cookie, &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"], expected);
    }
}

#[tokio::test]
async fn test_income_crud_flow() {
    let app = spawn_app().await;
    let cookie = register(&app, "alice", "alice@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request_as(
            "POST",
            "/api/v1/incomes",
            &cookie,
            &serde_json::json!({
                "title": "Salary",
                "amount": 5000.0,
                "category": "Job",
                "date": "2024-01-15",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["title"], "Salary");
    assert_eq!(body["data"]["amount"], 5000.0);
    assert_eq!(body["data"]["category"], "Job");
    assert_eq!(body["data"]["date"], "2024-01-15");
    let income_id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/incomes", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Partial update touches only the provided fields.
    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            &format!("/api/v1/incomes/{income_id}"),
            &cookie,
            &serde_json::json!({"amount": 5500.5}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["amount"], 5500.5);
    assert_eq!(body["data"]["title"], "Salary");

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            &format!("/api/v1/incomes/{income_id}"),
            &cookie,
            &serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "At least one field is required for update!");

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/api/v1/incomes/99999",
            &cookie,
            &serde_json::json!({"amount": 1.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Income not found!");

    let response = app
        .clone()
        .oneshot(bare_request(
            "DELETE",
            &format!("/api/v1/incomes/{income_id}"),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["message"], "Income deleted successfully!");

    let response = app
        .clone()
        .oneshot(bare_request(
            "DELETE",
            &format!("/api/v1/incomes/{income_id}"),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/incomes", Some(&cookie)))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_expense_crud_flow() {
    let app = spawn_app().await;
    let cookie = register(&app, "alice", "alice@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request_as(
            "POST",
            "/api/v1/expenses",
            &cookie,
            &serde_json::json!({
                "title": "Groceries",
                "amount": 120.75,
                "category": "Food",
                "date": "2024-01-20",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["title"], "Groceries");
    let expense_id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            &format!("/api/v1/expenses/{expense_id}"),
            &cookie,
            &serde_json::json!({"category": "Household"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["category"], "Household");
    assert_eq!(body["data"]["amount"], 120.75);

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/api/v1/expenses/99999",
            &cookie,
            &serde_json::json!({"amount": 1.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Expense not found!");

    let response = app
        .clone()
        .oneshot(bare_request(
            "DELETE",
            &format!("/api/v1/expenses/{expense_id}"),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["message"], "Expense deleted successfully!");
}

#[tokio::test]
async fn test_ledger_rows_are_scoped_per_account() {
    let app = spawn_app().await;
    let alice = register(&app, "alice", "alice@example.com").await;
    let bob = register(&app, "bob", "bob@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request_as(
            "POST",
            "/api/v1/incomes",
            &alice,
            &serde_json::json!({
                "title": "Salary",
                "amount": 5000.0,
                "category": "Job",
                "date": "2024-01-15",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let income_id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/incomes", Some(&bob)))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    // Another account's rows are invisible even by id.
    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            &format!("/api/v1/incomes/{income_id}"),
            &bob,
            &serde_json::json!({"amount": 1.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(bare_request(
            "DELETE",
            &format!("/api/v1/incomes/{income_id}"),
            Some(&bob),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/incomes", Some(&alice)))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}
