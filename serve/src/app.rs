//! Axum app: state, CORS and router.
//!
//! Routes are mounted twice, at the root and under `/api`, so both API clients and
//! the web frontend (which calls `/api/...`) reach the same handlers.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use datahopper::ResearchRunner;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use super::handlers::{health, research};

/// Shared state: one validated research graph serving every request.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) runner: Arc<ResearchRunner>,
}

impl AppState {
    pub(crate) fn new(runner: ResearchRunner) -> Self {
        Self {
            runner: Arc::new(runner),
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(origin = %o, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/research", post(research))
        .route("/health", get(health))
}

/// Builds the router with CORS for `origins`.
pub(crate) fn router(state: AppState, origins: &[String]) -> Router {
    Router::new()
        .merge(routes())
        .nest("/api", routes())
        .layer(cors_layer(origins))
        .with_state(state)
}
