use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use time;

use crate::config::Config;
use crate::state::SharedState;

mod accounts;
pub mod auth;
mod emails;
mod error;
mod ledger;
mod observability;
mod otp;
mod system;
mod two_factor;
mod types;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn mailer(&self) -> &Arc<crate::services::Mailer> {
        &self.shared.mailer
    }

    #[must_use]
    pub fn account_service(&self) -> &Arc<dyn crate::services::AccountService> {
        &self.shared.account_service
    }

    #[must_use]
    pub fn otp_service(&self) -> &Arc<dyn crate::services::OtpService> {
        &self.shared.otp_service
    }

    #[must_use]
    pub fn two_factor_service(&self) -> &Arc<dyn crate::services::TwoFactorService> {
        &self.shared.two_factor_service
    }

    #[must_use]
    pub fn summary_service(&self) -> &Arc<crate::services::SummaryService> {
        &self.shared.summary_service
    }
}

pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (cors_origins, secure_cookies, session_ttl_minutes) = {
        let config = state.config().read().await;
        (
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.server.session_ttl_minutes,
        )
    };

    let protected_routes = create_protected_router();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            i64::try_from(session_ttl_minutes).unwrap_or(60),
        )));

    // The account collection route gates per method: registration is open,
    // reading and updating the profile check the session in the handler.
    let api_router = Router::new()
        .merge(protected_routes)
        .route(
            "/users",
            get(accounts::get_profile)
                .post(accounts::register)
                .put(accounts::update_profile),
        )
        .route("/users/login", post(accounts::login))
        .route("/users/logout", delete(accounts::logout))
        .route("/users/send-otp", post(otp::send_otp))
        .route("/users/verify-otp", post(otp::verify_otp))
        .route("/users/2fa/verify", post(two_factor::verify))
        .route("/emails/test-email", post(emails::test_email))
        .layer(session_layer)
        .with_state(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true)
    };

    Router::new()
        .nest("/api/v1", api_router)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
}

fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/reset-password", put(accounts::reset_password))
        .route("/users/currency", put(accounts::update_currency))
        .route("/users/2fa/status", get(two_factor::status))
        .route("/users/2fa/setup", post(two_factor::setup))
        .route("/users/2fa/enable", post(two_factor::enable))
        .route("/users/2fa/disable", post(two_factor::disable))
        .route("/incomes", get(ledger::list_incomes))
        .route("/incomes", post(ledger::add_income))
        .route("/incomes/{id}", put(ledger::update_income))
        .route("/incomes/{id}", delete(ledger::delete_income))
        .route("/expenses", get(ledger::list_expenses))
        .route("/expenses", post(ledger::add_expense))
        .route("/expenses/{id}", put(ledger::update_expense))
        .route("/expenses/{id}", delete(ledger::delete_expense))
        .route(
            "/emails/trigger-monthly-summary",
            post(emails::trigger_monthly_summary),
        )
        .route("/system/metrics", get(system::get_metrics))
        .route_layer(middleware::from_fn(auth::auth_middleware))
}
