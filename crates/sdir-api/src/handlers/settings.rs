//! Render settings handlers.
//!
//! The key is held in memory only and never echoed back.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use sdir_render::RenderCredentials;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Settings response.
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub has_render_api_key: bool,
    pub use_proxy: bool,
}

impl From<&RenderCredentials> for SettingsResponse {
    fn from(credentials: &RenderCredentials) -> Self {
        Self {
            has_render_api_key: credentials.has_api_key(),
            use_proxy: credentials.use_proxy,
        }
    }
}

/// Get render settings.
pub async fn get_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    Json(SettingsResponse::from(&state.render_credentials()))
}

/// Settings update request.
///
/// An absent `render_api_key` keeps the current key; an empty one clears it.
#[derive(Debug, Deserialize, Validate)]
pub struct SettingsUpdateRequest {
    #[serde(default)]
    #[validate(length(max = 512))]
    pub render_api_key: Option<String>,
    pub use_proxy: bool,
}

/// Update render settings.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<SettingsUpdateRequest>,
) -> ApiResult<Json<SettingsResponse>> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let updated = state.update_render_credentials(|credentials| {
        if let Some(key) = request.render_api_key {
            credentials.set_api_key(Some(key));
        }
        credentials.use_proxy = request.use_proxy;
    });

    info!(
        has_render_api_key = updated.has_api_key(),
        use_proxy = updated.use_proxy,
        "Render settings updated"
    );

    Ok(Json(SettingsResponse::from(&updated)))
}
