//! Shared scene context for one analyzed script.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Placeholder values used when a script names no city or era.
pub const PLACEHOLDER_CITY: &str = "Unidentified city";
pub const PLACEHOLDER_ERA: &str = "Unspecified historical era";
pub const PLACEHOLDER_STYLE: &str = "Cinematic historical realism";

/// City, era and visual style shared by every scene of an analysis.
///
/// Constructed once per analysis and never mutated afterwards. All three
/// fields are guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScriptContext {
    /// The main city identified in the narrative
    detected_city: String,

    /// The time period identified in the narrative
    detected_era: String,

    /// Short (3-4 word) description of the overall look
    visual_style_guide: String,
}

impl ScriptContext {
    /// Create a context, trimming each field and rejecting empty ones.
    pub fn new(
        detected_city: impl Into<String>,
        detected_era: impl Into<String>,
        visual_style_guide: impl Into<String>,
    ) -> ModelResult<Self> {
        let detected_city = non_empty(detected_city.into(), "detected_city")?;
        let detected_era = non_empty(detected_era.into(), "detected_era")?;
        let visual_style_guide = non_empty(visual_style_guide.into(), "visual_style_guide")?;

        Ok(Self {
            detected_city,
            detected_era,
            visual_style_guide,
        })
    }

    /// Context used when there is no narrative to extract anything from.
    pub fn placeholder() -> Self {
        Self {
            detected_city: PLACEHOLDER_CITY.to_string(),
            detected_era: PLACEHOLDER_ERA.to_string(),
            visual_style_guide: PLACEHOLDER_STYLE.to_string(),
        }
    }

    pub fn detected_city(&self) -> &str {
        &self.detected_city
    }

    pub fn detected_era(&self) -> &str {
        &self.detected_era
    }

    pub fn visual_style_guide(&self) -> &str {
        &self.visual_style_guide
    }

    /// Number of whitespace-separated words in the style guide.
    pub fn style_guide_word_count(&self) -> usize {
        self.visual_style_guide.split_whitespace().count()
    }

    /// True if `text` mentions the detected city (case-insensitive).
    pub fn mentions_city(&self, text: &str) -> bool {
        contains_ignore_case(text, &self.detected_city)
    }

    /// True if `text` mentions the detected era (case-insensitive).
    pub fn mentions_era(&self, text: &str) -> bool {
        contains_ignore_case(text, &self.detected_era)
    }
}

fn non_empty(value: String, field: &'static str) -> ModelResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelError::empty_field(field));
    }
    Ok(trimmed.to_string())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
