//! Render API client.

use reqwest::multipart::Form;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use sdir_models::{RenderDuration, RENDER_ASPECT_RATIO, RENDER_RESOLUTION};

use crate::config::RenderConfig;
use crate::credentials::RenderCredentials;
use crate::error::{RenderError, RenderResult};

/// Model requested from the render backend.
pub const RENDER_MODEL: &str = "grok-3";

/// Generation mode requested from the render backend.
pub const RENDER_MODE: &str = "custom";

/// Response fields that may carry the video URL, in lookup order.
pub const VIDEO_URL_FIELDS: [&str; 4] = ["url", "video_url", "link", "output"];

/// A successfully dispatched render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderOutcome {
    pub video_url: String,
    pub duration: RenderDuration,
}

/// Client for the external video generation API.
#[derive(Clone)]
pub struct RenderClient {
    endpoint: Url,
    relay_base: String,
    client: Client,
}

impl RenderClient {
    /// Create a new render client from configuration.
    pub fn new(config: &RenderConfig) -> RenderResult<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| RenderError::config_error(format!("Invalid render endpoint: {}", e)))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RenderError::config_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            relay_base: config.relay_base.clone(),
            client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// URL the request goes to: the endpoint, or the relay wrapping it.
    pub fn target_url(&self, use_proxy: bool) -> RenderResult<Url> {
        if !use_proxy {
            return Ok(self.endpoint.clone());
        }

        let relayed = format!(
            "{}{}",
            self.relay_base,
            urlencoding::encode(self.endpoint.as_str())
        );
        Url::parse(&relayed)
            .map_err(|e| RenderError::config_error(format!("Invalid relay URL: {}", e)))
    }

    /// Send `prompt` to the render backend.
    ///
    /// `requested_duration` is snapped to 6, 10 or 15 seconds. Resolution
    /// and aspect ratio are always 720p landscape.
    pub async fn dispatch(
        &self,
        credentials: &RenderCredentials,
        prompt: &str,
        requested_duration: f64,
    ) -> RenderResult<RenderOutcome> {
        let api_key = credentials.api_key().ok_or(RenderError::MissingApiKey)?;
        let duration = RenderDuration::from_requested(requested_duration);
        let target = self.target_url(credentials.use_proxy)?;

        info!(
            duration = %duration,
            use_proxy = credentials.use_proxy,
            prompt_chars = prompt.len(),
            "Dispatching render"
        );

        let form = Form::new()
            .text("prompt", prompt.to_string())
            .text("model", RENDER_MODEL)
            .text("resolution", RENDER_RESOLUTION)
            .text("aspect_ratio", RENDER_ASPECT_RATIO)
            .text("duration", duration.as_str())
            .text("mode", RENDER_MODE);

        let response = self
            .client
            .post(target)
            .header("x-api-key", api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify_send_error(e, credentials.use_proxy))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RenderError::transport(format!("Failed to read response: {}", e.without_url())))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Render API returned an error");
            return Err(RenderError::Response {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = serde_json::from_str(&body)
            .map_err(|e| RenderError::contract(format!("response is not JSON: {}", e)))?;

        let video_url = extract_video_url(&json).ok_or_else(|| {
            RenderError::contract(format!(
                "no video URL in response (looked for {})",
                VIDEO_URL_FIELDS.join(", ")
            ))
        })?;

        debug!(video_url = %video_url, "Render dispatched");
        Ok(RenderOutcome {
            video_url: video_url.to_string(),
            duration,
        })
    }

    fn classify_send_error(&self, e: reqwest::Error, use_proxy: bool) -> RenderError {
        if e.is_connect() && !use_proxy {
            return RenderError::RelayRequired(self.endpoint.to_string());
        }
        if e.is_timeout() {
            return RenderError::transport("render request timed out");
        }
        RenderError::transport(e.without_url().to_string())
    }
}

/// First non-empty string among [`VIDEO_URL_FIELDS`].
pub fn extract_video_url(response: &Value) -> Option<&str> {
    VIDEO_URL_FIELDS
        .iter()
        .filter_map(|field| response.get(field).and_then(Value::as_str))
        .find(|url| !url.trim().is_empty())
}
