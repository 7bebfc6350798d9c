//! In-memory case management REST API.
//!
//! Cases are kept in an ordered, mutex-guarded collection owned by
//! [`repository::InMemoryCaseRepository`] and exposed over axum routes:
//! list, get, create, partial update, delete and a health check.

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod request_id;
pub mod security_headers;
pub mod shutdown;

pub use error::{ApiError, ApiResult, ErrorBody};
pub use models::{Case, CreateCaseRequest, HealthResponse, UpdateCaseRequest};
pub use repository::{CaseRepository, InMemoryCaseRepository, StoreError};
pub use request_id::RequestId;
pub use security_headers::SecurityHeadersConfig;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub cases: Arc<dyn CaseRepository>,
    pub security_headers: SecurityHeadersConfig,
}

impl AppState {
    /// Create state around `repository` with development security headers
    pub fn new(repository: impl CaseRepository + 'static) -> Self {
        Self {
            cases: Arc::new(repository),
            security_headers: SecurityHeadersConfig::default(),
        }
    }

    #[must_use]
    pub fn with_security_headers(mut self, config: SecurityHeadersConfig) -> Self {
        self.security_headers = config;
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(InMemoryCaseRepository::new())
    }
}

/// Build application router
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/cases",
            get(handlers::list_cases).post(handlers::create_case),
        )
        .route(
            "/cases/:id",
            get(handlers::get_case)
                .put(handlers::update_case)
                .delete(handlers::delete_case),
        )
        .route("/health", get(handlers::health))
        .layer(middleware::from_fn_with_state(
            state.security_headers.clone(),
            security_headers::add_security_headers,
        ))
        .layer(cors)
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
