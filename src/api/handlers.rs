use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::linkedin::AnalyticsService;
use crate::transport::{CircuitBreaker, CircuitSnapshot, TransportError};

pub struct AppState {
    pub analytics: Arc<dyn AnalyticsService>,
    pub breaker: Arc<CircuitBreaker>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub circuit: CircuitSnapshot,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Upstream failures surface as a plain server error carrying the message.
pub fn upstream_failure(endpoint: &str, err: TransportError) -> ApiError {
    if err.is_cancelled() {
        tracing::debug!(endpoint, "request cancelled before upstream call completed");
    } else {
        tracing::error!(endpoint, error = %err, "failed to load LinkedIn analytics");
    }

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("Failed to load {endpoint}: {err}"),
        }),
    )
}

/// Health check endpoint, including the upstream circuit state
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        circuit: state.breaker.snapshot(),
    })
}
