//! Render client configuration.

use std::time::Duration;

use crate::credentials::RenderCredentials;

/// Default render endpoint.
pub const DEFAULT_RENDER_ENDPOINT: &str = "https://api.geminigen.ai/uapi/v1/video-gen/grok";

/// Default CORS relay prefix. The percent-encoded target URL is appended.
pub const DEFAULT_RELAY_BASE: &str = "https://corsproxy.io/?";

/// Configuration for [`crate::RenderClient`].
#[derive(Clone)]
pub struct RenderConfig {
    /// Video generation endpoint
    pub endpoint: String,
    /// Relay prefix used when the proxy option is on
    pub relay_base: String,
    /// HTTP timeout for one dispatch
    pub timeout: Duration,
    /// Initial API key, editable at runtime through settings
    pub api_key: Option<String>,
    /// Initial proxy setting
    pub use_proxy: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_RENDER_ENDPOINT.to_string(),
            relay_base: DEFAULT_RELAY_BASE.to_string(),
            timeout: Duration::from_secs(300),
            api_key: None,
            use_proxy: false,
        }
    }
}

impl RenderConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("RENDER_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_RENDER_ENDPOINT.to_string()),
            relay_base: std::env::var("RENDER_RELAY_URL")
                .unwrap_or_else(|_| DEFAULT_RELAY_BASE.to_string()),
            timeout: Duration::from_secs(
                std::env::var("RENDER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            api_key: std::env::var("RENDER_API_KEY").ok(),
            use_proxy: std::env::var("RENDER_USE_PROXY")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(false),
        }
    }

    /// Credentials seeded from this config.
    pub fn initial_credentials(&self) -> RenderCredentials {
        RenderCredentials::new(self.api_key.clone(), self.use_proxy)
    }
}

impl std::fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderConfig")
            .field("endpoint", &self.endpoint)
            .field("relay_base", &self.relay_base)
            .field("timeout", &self.timeout)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("use_proxy", &self.use_proxy)
            .finish()
    }
}
