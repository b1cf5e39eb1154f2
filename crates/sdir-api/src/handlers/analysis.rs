//! Script analysis handler.
//!
//! One analysis at a time: the processing flag is claimed before the
//! backend call and released by a drop guard. The session is only replaced
//! when the whole analysis succeeds.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use sdir_analysis::AnalysisError;
use sdir_models::{AnalysisWarning, OutputMode, Session};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Request to analyze a script.
#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    /// Narration script, structural headers included
    #[validate(length(max = 200000))]
    pub script: String,
    /// Output mode; falls back to the configured default
    #[serde(default)]
    pub mode: Option<OutputMode>,
}

/// Result of a committed analysis.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis_id: String,
    pub session: Session,
    pub warnings: Vec<AnalysisWarning>,
}

/// Analyze a script and replace the session with the result.
pub async fn analyze_script(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalyzeResponse>> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    if request.script.trim().is_empty() {
        return Err(AnalysisError::EmptyScript.into());
    }

    let analyzer = state.analyzer()?;
    let guard = state
        .begin_analysis()
        .ok_or_else(|| ApiError::conflict("An analysis is already in progress"))?;

    let template = state.analysis_config.template(request.mode);
    let start = Instant::now();

    let outcome = match analyzer.analyze(&request.script, &template).await {
        Ok(outcome) => outcome,
        Err(e) => {
            metrics::record_analysis(e.kind(), start.elapsed().as_secs_f64());
            return Err(e.into());
        }
    };

    metrics::record_analysis("ok", start.elapsed().as_secs_f64());
    metrics::record_analysis_output(outcome.segments.len(), outcome.warnings.len());

    state
        .session_mut()
        .replace_all(outcome.context, outcome.segments);
    drop(guard);
    let session = state.session().snapshot();

    info!(
        analysis_id = %outcome.analysis_id,
        scenes = session.segments.len(),
        warnings = outcome.warnings.len(),
        mode = %template.mode,
        "Session replaced with new analysis"
    );

    Ok(Json(AnalyzeResponse {
        analysis_id: outcome.analysis_id,
        session,
        warnings: outcome.warnings,
    }))
}
