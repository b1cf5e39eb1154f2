//! Analysis error types.

use thiserror::Error;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that end an analysis request. None of them is retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Script is empty")]
    EmptyScript,

    #[error("Analysis backend unreachable: {0}")]
    Transport(String),

    #[error("Analysis backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("Analysis backend returned an empty response")]
    EmptyResponse,

    #[error("Analysis response violates the contract: {0}")]
    Contract(String),

    #[error("Analysis configuration error: {0}")]
    Config(String),
}

impl AnalysisError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn contract(msg: impl Into<String>) -> Self {
        Self::Contract(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for responses that arrived but cannot be used.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, AnalysisError::Contract(_) | AnalysisError::EmptyResponse)
    }

    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::EmptyScript => "empty_script",
            AnalysisError::Transport(_) => "transport",
            AnalysisError::Backend { .. } => "backend",
            AnalysisError::EmptyResponse => "empty_response",
            AnalysisError::Contract(_) => "contract",
            AnalysisError::Config(_) => "config",
        }
    }
}
