//! Session handlers: snapshot, discard, segment lookup and prompt edits.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{debug, info};

use sdir_models::{SceneSegment, SegmentId, Session};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Current session snapshot.
pub async fn get_session(State(state): State<AppState>) -> Json<Session> {
    let session = state.session().snapshot();
    Json(session)
}

/// Discard the session and go back to an empty input state.
pub async fn clear_session(State(state): State<AppState>) -> StatusCode {
    state.session_mut().clear();
    info!("Session discarded");
    StatusCode::NO_CONTENT
}

/// One segment by id.
pub async fn get_segment(
    State(state): State<AppState>,
    Path(segment_id): Path<String>,
) -> ApiResult<Json<SceneSegment>> {
    let id = SegmentId::from_string(segment_id);
    let segment = state.session().segment(&id).cloned();
    segment
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Segment {} not found", id)))
}

/// Prompt edit request.
#[derive(Debug, Deserialize)]
pub struct UpdatePromptRequest {
    pub visual_prompt: String,
}

/// Replace one segment's visual prompt.
///
/// An unknown id leaves the session unchanged; the snapshot is returned
/// either way.
pub async fn update_segment_prompt(
    State(state): State<AppState>,
    Path(segment_id): Path<String>,
    Json(request): Json<UpdatePromptRequest>,
) -> Json<Session> {
    let id = SegmentId::from_string(segment_id);
    let mut store = state.session_mut();

    if store.update_segment_prompt(&id, request.visual_prompt) {
        debug!(segment_id = %id, "Prompt updated");
    } else {
        debug!(segment_id = %id, "Prompt edit for unknown segment ignored");
    }

    let session = store.snapshot();
    Json(session)
}
