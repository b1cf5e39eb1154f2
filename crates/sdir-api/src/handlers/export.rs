//! Text export handler.

use axum::extract::State;
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};

use sdir_models::{export_as_text, export_filename};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Download all prompts as plain text, one blank line between prompts.
pub async fn export_prompts(State(state): State<AppState>) -> ApiResult<Response> {
    let (text, filename) = {
        let store = state.session();
        (
            export_as_text(store.segments()),
            export_filename(store.context()),
        )
    };

    let disposition = HeaderValue::from_str(&content_disposition(&filename))
        .map_err(|e| ApiError::internal(format!("Invalid export filename: {}", e)))?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        text,
    )
        .into_response())
}

/// Attachment header with an ASCII fallback and an RFC 5987 UTF-8 name.
fn content_disposition(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        urlencoding::encode(filename)
    )
}
