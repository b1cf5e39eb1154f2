//! Analysis configuration.

use std::time::Duration;

use sdir_models::{HookDensity, OutputMode};

use crate::template::PromptTemplate;

/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

/// Default Gemini API base URL.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Configuration for the analysis backend and post-processing.
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Gemini API key
    pub api_key: Option<String>,
    /// Gemini model name
    pub model: String,
    /// Gemini API base URL
    pub base_url: String,
    /// Default output mode for new analyses
    pub output_mode: OutputMode,
    /// Hook-region density; falls back to the mode's default
    pub hook_density: Option<HookDensity>,
    /// HTTP timeout for one analysis call
    pub timeout: Duration,
    /// Fail the analysis when scene texts do not cover the narrative
    pub strict_coverage: bool,
    /// Prefix missing city/era into prompts
    pub anchor_context: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            output_mode: OutputMode::Video,
            hook_density: None,
            timeout: Duration::from_secs(120),
            strict_coverage: false,
            anchor_context: true,
        }
    }
}

impl AnalysisConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            output_mode: std::env::var("ANALYSIS_OUTPUT_MODE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            hook_density: std::env::var("ANALYSIS_HOOK_DENSITY")
                .ok()
                .and_then(|s| s.parse().ok()),
            timeout: Duration::from_secs(
                std::env::var("ANALYSIS_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
            strict_coverage: env_flag("ANALYSIS_STRICT_COVERAGE", false),
            anchor_context: env_flag("ANALYSIS_ANCHOR_CONTEXT", true),
        }
    }

    /// Template for `mode`, or for the configured default mode.
    pub fn template(&self, mode: Option<OutputMode>) -> PromptTemplate {
        let mode = mode.unwrap_or(self.output_mode);
        let template = PromptTemplate::for_mode(mode);
        match self.hook_density {
            Some(density) => template.with_hook_density(density),
            None => template,
        }
    }
}

impl std::fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("output_mode", &self.output_mode)
            .field("hook_density", &self.hook_density)
            .field("timeout", &self.timeout)
            .field("strict_coverage", &self.strict_coverage)
            .field("anchor_context", &self.anchor_context)
            .finish()
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}
