//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use sdir_analysis::AnalysisError;
use sdir_render::RenderError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Message shown for any analysis failure; the cause goes to the logs.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze script. Please try again.";

/// Message shown for internal errors; the cause goes to the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("{0}")]
    Render(#[from] RenderError),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Analysis(e) => match e {
                AnalysisError::EmptyScript => StatusCode::BAD_REQUEST,
                AnalysisError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_GATEWAY,
            },
            ApiError::Render(e) => match e {
                RenderError::MissingApiKey => StatusCode::BAD_REQUEST,
                RenderError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_GATEWAY,
            },
        }
    }

    fn code(&self) -> Option<String> {
        match self {
            ApiError::Analysis(e) => Some(format!("analysis_{}", e.kind())),
            ApiError::Render(e) => Some(format!("render_{}", e.kind())),
            ApiError::Conflict(_) => Some("analysis_in_progress".to_string()),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let detail = match &self {
            ApiError::Analysis(AnalysisError::EmptyScript) => self.to_string(),
            ApiError::Analysis(e) => {
                error!(kind = e.kind(), "Analysis failed: {}", e);
                ANALYSIS_FAILED_MESSAGE.to_string()
            }
            // Render errors are shown to the user verbatim, status and body included
            ApiError::Render(e) => e.to_string(),
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            detail,
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}
