//! Render dispatch handler.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use validator::Validate;

use sdir_models::{RenderDuration, SegmentId, RENDER_ASPECT_RATIO, RENDER_RESOLUTION};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Request to render one segment.
///
/// `resolution` and `aspect_ratio` are accepted for compatibility and
/// ignored; every render is 720p landscape.
#[derive(Debug, Deserialize, Validate)]
pub struct RenderSegmentRequest {
    #[validate(range(min = 0.0))]
    pub duration_seconds: f64,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
}

/// A dispatched render.
#[derive(Debug, Serialize)]
pub struct RenderSegmentResponse {
    pub segment_id: SegmentId,
    pub video_url: String,
    pub duration: RenderDuration,
}

/// Send one segment's prompt to the render backend.
pub async fn render_segment(
    State(state): State<AppState>,
    Path(segment_id): Path<String>,
    Json(request): Json<RenderSegmentRequest>,
) -> ApiResult<Json<RenderSegmentResponse>> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let id = SegmentId::from_string(segment_id);
    let prompt = state
        .session()
        .segment(&id)
        .map(|s| s.visual_prompt().to_string())
        .ok_or_else(|| ApiError::not_found(format!("Segment {} not found", id)))?;

    if request.resolution.as_deref().is_some_and(|r| r != RENDER_RESOLUTION)
        || request.aspect_ratio.as_deref().is_some_and(|a| a != RENDER_ASPECT_RATIO)
    {
        debug!(
            segment_id = %id,
            resolution = ?request.resolution,
            aspect_ratio = ?request.aspect_ratio,
            "Ignoring requested resolution/aspect ratio"
        );
    }

    let credentials = state.render_credentials();
    let outcome = match state
        .render
        .dispatch(&credentials, &prompt, request.duration_seconds)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(segment_id = %id, kind = e.kind(), "Render failed: {}", e);
            metrics::record_render(e.kind());
            return Err(e.into());
        }
    };

    metrics::record_render("ok");

    Ok(Json(RenderSegmentResponse {
        segment_id: id,
        video_url: outcome.video_url,
        duration: outcome.duration,
    }))
}
