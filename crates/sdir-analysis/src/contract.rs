//! Response contract of the generative backend.
//!
//! Every leaf field is mandatory. Missing, null or empty values are rejected
//! with [`AnalysisError::Contract`]; nothing is defaulted.

use serde::{Deserialize, Serialize};
use serde_json::json;

use sdir_models::ScriptContext;

use crate::error::{AnalysisError, AnalysisResult};

/// Structured analysis returned by a decomposer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub context: ContextPayload,
    pub scenes: Vec<ScenePayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextPayload {
    pub detected_city: String,
    pub detected_era: String,
    pub visual_style_guide: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenePayload {
    pub text: String,
    pub visual_prompt: String,
}

impl AnalysisResponse {
    /// Parse the raw text body of a backend response.
    ///
    /// Tolerates a surrounding markdown code fence.
    pub fn parse(raw: &str) -> AnalysisResult<Self> {
        let text = strip_code_fence(raw);
        if text.is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }

        serde_json::from_str(text)
            .map_err(|e| AnalysisError::contract(format!("invalid analysis JSON: {}", e)))
    }

    /// Validate every field and split into the context and the scene list.
    pub fn into_parts(self) -> AnalysisResult<(ScriptContext, Vec<ScenePayload>)> {
        let context = ScriptContext::new(
            self.context.detected_city,
            self.context.detected_era,
            self.context.visual_style_guide,
        )
        .map_err(|e| AnalysisError::contract(e.to_string()))?;

        if self.scenes.is_empty() {
            return Err(AnalysisError::contract("response contains no scenes"));
        }

        for (index, scene) in self.scenes.iter().enumerate() {
            if scene.text.trim().is_empty() {
                return Err(AnalysisError::contract(format!("scene {index} has empty text")));
            }
            if scene.visual_prompt.trim().is_empty() {
                return Err(AnalysisError::contract(format!(
                    "scene {index} has empty visual_prompt"
                )));
            }
        }

        Ok((context, self.scenes))
    }
}

/// Gemini `responseSchema` describing [`AnalysisResponse`].
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "context": {
                "type": "OBJECT",
                "properties": {
                    "detected_city": { "type": "STRING", "description": "The main city identified." },
                    "detected_era": { "type": "STRING", "description": "The time period identified." },
                    "visual_style_guide": { "type": "STRING", "description": "3-4 words describing the overall look." }
                },
                "required": ["detected_city", "detected_era", "visual_style_guide"]
            },
            "scenes": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "text": { "type": "STRING", "description": "Verbatim narration of the scene, no headers." },
                        "visual_prompt": { "type": "STRING", "description": "Detailed 16:9 prompt." }
                    },
                    "required": ["text", "visual_prompt"]
                }
            }
        },
        "required": ["context", "scenes"]
    })
}

fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "context": {"detected_city": "London", "detected_era": "1850", "visual_style_guide": "foggy Victorian realism"},
        "scenes": [
            {"text": "In 1850, the streets of London were shrouded in fog.", "visual_prompt": "1850 London street in fog"},
            {"text": "A child ran past the gas lamp.", "visual_prompt": "1850 London, child running past a gas lamp"}
        ]
    }"#;

    #[test]
    fn test_parse_valid_response() {
        let response = AnalysisResponse::parse(VALID).unwrap();
        let (context, scenes) = response.into_parts().unwrap();
        assert_eq!(context.detected_city(), "London");
        assert_eq!(scenes.len(), 2);
    }

    #[test]
    fn test_parse_fenced_response() {
        let fenced = format!("```json\n{VALID}\n```");
        assert!(AnalysisResponse::parse(&fenced).is_ok());
    }

    #[test]
    fn test_empty_body_is_empty_response() {
        assert_eq!(AnalysisResponse::parse("   ").unwrap_err(), AnalysisError::EmptyResponse);
        assert_eq!(AnalysisResponse::parse("```json\n```").unwrap_err(), AnalysisError::EmptyResponse);
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let missing_era = r#"{"context": {"detected_city": "London", "visual_style_guide": "x"}, "scenes": []}"#;
        assert!(matches!(
            AnalysisResponse::parse(missing_era),
            Err(AnalysisError::Contract(_))
        ));

        let missing_prompt = r#"{"context": {"detected_city": "London", "detected_era": "1850", "visual_style_guide": "x"},
            "scenes": [{"text": "t"}]}"#;
        assert!(matches!(
            AnalysisResponse::parse(missing_prompt),
            Err(AnalysisError::Contract(_))
        ));

        let missing_scenes = r#"{"context": {"detected_city": "London", "detected_era": "1850", "visual_style_guide": "x"}}"#;
        assert!(matches!(
            AnalysisResponse::parse(missing_scenes),
            Err(AnalysisError::Contract(_))
        ));
    }

    #[test]
    fn test_null_field_is_rejected() {
        let null_city = r#"{"context": {"detected_city": null, "detected_era": "1850", "visual_style_guide": "x"}, "scenes": []}"#;
        assert!(matches!(
            AnalysisResponse::parse(null_city),
            Err(AnalysisError::Contract(_))
        ));
    }

    #[test]
    fn test_empty_values_are_rejected() {
        let empty_city = r#"{"context": {"detected_city": " ", "detected_era": "1850", "visual_style_guide": "x"},
            "scenes": [{"text": "t", "visual_prompt": "p"}]}"#;
        let err = AnalysisResponse::parse(empty_city).unwrap().into_parts().unwrap_err();
        assert!(err.to_string().contains("detected_city"));

        let no_scenes = r#"{"context": {"detected_city": "London", "detected_era": "1850", "visual_style_guide": "x"}, "scenes": []}"#;
        assert!(AnalysisResponse::parse(no_scenes).unwrap().into_parts().is_err());

        let empty_prompt = r#"{"context": {"detected_city": "London", "detected_era": "1850", "visual_style_guide": "x"},
            "scenes": [{"text": "t", "visual_prompt": ""}]}"#;
        assert!(AnalysisResponse::parse(empty_prompt).unwrap().into_parts().is_err());
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = response_schema();
        assert_eq!(schema["required"], json!(["context", "scenes"]));
        assert_eq!(
            schema["properties"]["scenes"]["items"]["required"],
            json!(["text", "visual_prompt"])
        );
    }
}
