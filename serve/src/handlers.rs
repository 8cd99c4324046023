//! Request handlers and wire types.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use datahopper::ResearchOutcome;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::app::AppState;
use super::response::ApiError;

/// `POST /research` body. A missing question is treated like a blank one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchRequest {
    #[serde(default)]
    pub question: String,
}

/// `POST /research` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchResponse {
    pub final_answer: String,
    pub google_results: Option<Value>,
    pub bing_results: Option<Value>,
    pub reddit_results: Option<Value>,
    pub status: String,
}

impl From<ResearchOutcome> for ResearchResponse {
    fn from(outcome: ResearchOutcome) -> Self {
        Self {
            final_answer: outcome.final_answer,
            google_results: outcome.google_results,
            bing_results: outcome.bing_results,
            reddit_results: outcome.reddit_results,
            status: "completed".to_string(),
        }
    }
}

/// `GET /health` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

pub(crate) async fn research(
    State(state): State<AppState>,
    payload: Result<Json<ResearchRequest>, JsonRejection>,
) -> Result<Json<ResearchResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected research request body");
        ApiError::from(rejection)
    })?;
    info!(question = %request.question, "Research request");
    match state.runner.research(&request.question).await {
        Ok(outcome) => Ok(Json(outcome.into())),
        Err(e) => {
            warn!(error = %e, "Research request failed");
            Err(e.into())
        }
    }
}

pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "DataHopper API is running".to_string(),
    })
}
