//! HTTP API
//!
//! `POST /predict_risk` plus health, stats and reload endpoints. CORS is
//! wide open: any origin, method and header, with credentials.

use crate::{
    features::{FieldError, RiskInput, ValidationErrors},
    inference::{LoadPolicy, RiskOutput, RiskScorer},
    ScoringError,
};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// API state
pub struct AppState {
    /// Shared scorer
    pub scorer: Arc<RiskScorer>,
}

impl AppState {
    /// Wrap a scorer
    pub fn new(scorer: Arc<RiskScorer>) -> Self {
        Self { scorer }
    }
}

/// Build the API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/predict_risk", post(predict_risk))
        .route("/reload_model", post(reload_model))
        .route("/health", get(health))
        .route("/stats", get(stats))
        // Mirrors origin, method and headers so credentials can be allowed.
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// API error, rendered with a `detail` field.
#[derive(Debug)]
pub enum ApiError {
    /// 422 with one entry per offending field
    Validation(ValidationErrors),
    /// 500 with the raw message
    Scoring(ScoringError),
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        ApiError::Validation(e)
    }
}

impl From<ScoringError> for ApiError {
    fn from(e: ScoringError) -> Self {
        ApiError::Scoring(e)
    }
}

/// Validation error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationDetail {
    /// One entry per offending field
    pub detail: Vec<FieldError>,
}

/// Internal error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Error message
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationDetail { detail: errors.0 }),
            )
                .into_response(),
            ApiError::Scoring(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorDetail { detail: e.to_string() }),
            )
                .into_response(),
        }
    }
}

/// Score an accident-context record
#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn predict_risk(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<RiskOutput>, ApiError> {
    let input = RiskInput::from_json_slice(&body).map_err(|e| {
        tracing::debug!("Rejected input: {}", e);
        e
    })?;

    let scorer = Arc::clone(&state.scorer);
    let output = tokio::task::spawn_blocking(move || scorer.score(&input))
        .await
        .map_err(|e| ScoringError::Task(e.to_string()))??;

    Ok(Json(output))
}

/// Reload response
#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    /// Always `reloaded`
    pub status: String,
}

/// Re-read the model artifact
pub async fn reload_model(State(state): State<Arc<AppState>>) -> Result<Json<ReloadResponse>, ApiError> {
    let scorer = Arc::clone(&state.scorer);
    tokio::task::spawn_blocking(move || scorer.reload())
        .await
        .map_err(|e| ScoringError::Task(e.to_string()))??;

    Ok(Json(ReloadResponse {
        status: "reloaded".into(),
    }))
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `healthy`
    pub status: String,
    /// Crate version
    pub version: String,
    /// RFC 3339 time of the check
    pub timestamp: String,
}

/// Health check
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Stats response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Scoring calls made
    pub total_requests: u64,
    /// Calls that succeeded
    pub successful: u64,
    /// Calls that failed
    pub failed: u64,
    /// Successful model loads
    pub model_loads: u64,
    /// Mean scoring latency in microseconds
    pub avg_latency_us: f64,
    /// Active load policy
    pub load_policy: LoadPolicy,
}

/// Scoring statistics
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let stats = state.scorer.stats();
    Json(StatsResponse {
        total_requests: stats.total_requests,
        successful: stats.successful,
        failed: stats.failed,
        model_loads: stats.model_loads,
        avg_latency_us: stats.avg_latency_us(),
        load_policy: state.scorer.policy(),
    })
}
