//! Gemini AI client for script analysis.
//!
//! Sends the analysis instructions with a JSON response schema and hands the
//! returned text to the response contract.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::config::AnalysisConfig;
use crate::contract::{response_schema, AnalysisResponse};
use crate::decomposer::SceneDecomposer;
use crate::error::{AnalysisError, AnalysisResult};
use crate::template::PromptTemplate;

/// Gemini API client.
pub struct GeminiClient {
    api_key: String,
    model: String,
    endpoint: Url,
    client: Client,
}

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiClient {
    /// Create a new Gemini client from configuration.
    pub fn new(config: &AnalysisConfig) -> AnalysisResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AnalysisError::config_error("GEMINI_API_KEY not set"))?;

        let endpoint = Url::parse(&format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        ))
        .map_err(|e| AnalysisError::config_error(format!("Invalid Gemini base URL: {}", e)))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AnalysisError::config_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            model: config.model.clone(),
            endpoint,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Call Gemini and return the text of the first candidate part.
    async fn generate(&self, prompt: String) -> AnalysisResult<String> {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::transport(format!("Gemini API request failed: {}", e.without_url())))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Backend { status, body });
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            AnalysisError::contract(format!("Failed to parse Gemini response: {}", e.without_url()))
        })?;

        let text = gemini_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or(AnalysisError::EmptyResponse)?;

        debug!(model = %self.model, chars = text.len(), "Gemini returned analysis text");
        Ok(text)
    }
}

#[async_trait]
impl SceneDecomposer for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn decompose(
        &self,
        script: &str,
        template: &PromptTemplate,
    ) -> AnalysisResult<AnalysisResponse> {
        info!(
            model = %self.model,
            mode = %template.mode,
            script_chars = script.len(),
            "Requesting scene analysis from Gemini"
        );

        let text = self.generate(template.render(script)).await?;
        AnalysisResponse::parse(&text)
    }
}
