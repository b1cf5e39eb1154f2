//! Health check handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: ReadinessChecks,
}

#[derive(Serialize)]
pub struct ReadinessChecks {
    pub analysis_backend: CheckStatus,
    /// Informational; renders fail individually without a key.
    pub render_credentials: CheckStatus,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CheckStatus {
    fn ok(detail: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            detail: Some(detail.into()),
        }
    }

    fn missing(detail: impl Into<String>) -> Self {
        Self {
            status: "missing".to_string(),
            detail: Some(detail.into()),
        }
    }
}

/// Readiness check endpoint (readiness probe).
/// Ready when an analysis backend is configured.
pub async fn ready(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let analysis_backend = match &state.analyzer {
        Some(analyzer) => CheckStatus::ok(analyzer.decomposer_name()),
        None => CheckStatus::missing("GEMINI_API_KEY not set"),
    };

    let render_credentials = if state.render_credentials().has_api_key() {
        CheckStatus::ok("render API key set")
    } else {
        CheckStatus::missing("render API key not set")
    };

    let is_ready = state.analyzer.is_some();

    let response = ReadinessResponse {
        status: if is_ready { "ready" } else { "not_ready" }.to_string(),
        checks: ReadinessChecks {
            analysis_backend,
            render_credentials,
        },
    };

    if is_ready {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
