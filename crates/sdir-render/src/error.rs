//! Render error types.

use thiserror::Error;

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while dispatching a render. Each one is scoped to
/// a single scene.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Render API key is not set")]
    MissingApiKey,

    #[error("Network Error: {0}")]
    Transport(String),

    #[error(
        "Network Error: Failed to fetch {0}. The render API may be blocking direct requests. \
         Try enabling the 'CORS Proxy' option in Settings."
    )]
    RelayRequired(String),

    #[error("API Error ({status}): {body}")]
    Response { status: u16, body: String },

    #[error("Unexpected render response: {0}")]
    Contract(String),

    #[error("Render configuration error: {0}")]
    Config(String),
}

impl RenderError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn contract(msg: impl Into<String>) -> Self {
        Self::Contract(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RenderError::MissingApiKey => "missing_api_key",
            RenderError::Transport(_) => "transport",
            RenderError::RelayRequired(_) => "relay_required",
            RenderError::Response { .. } => "response",
            RenderError::Contract(_) => "contract",
            RenderError::Config(_) => "config",
        }
    }
}
