//! Scene segment models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a scene segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SegmentId(pub String);

impl SegmentId {
    /// Generate a new random segment ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SegmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One contiguous span of narration and the visual prompt generated for it.
///
/// `id` and `original_text` never change after creation. `is_hook` is only
/// written by [`crate::tag_hooks`]; the prompt is the single editable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SceneSegment {
    /// Opaque unique identifier
    id: SegmentId,

    /// Verbatim narrative span (headers stripped)
    original_text: String,

    /// Synthesized prompt, editable by the user
    visual_prompt: String,

    /// Whether this is one of the leading hook segments
    is_hook: bool,
}

impl SceneSegment {
    /// Create a segment with a fresh id. Hook status starts unset.
    pub fn new(original_text: impl Into<String>, visual_prompt: impl Into<String>) -> Self {
        Self::with_id(SegmentId::new(), original_text, visual_prompt)
    }

    /// Create a segment with a known id.
    pub fn with_id(
        id: SegmentId,
        original_text: impl Into<String>,
        visual_prompt: impl Into<String>,
    ) -> Self {
        Self {
            id,
            original_text: original_text.into(),
            visual_prompt: visual_prompt.into(),
            is_hook: false,
        }
    }

    pub fn id(&self) -> &SegmentId {
        &self.id
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn visual_prompt(&self) -> &str {
        &self.visual_prompt
    }

    pub fn is_hook(&self) -> bool {
        self.is_hook
    }

    /// Replace the visual prompt.
    pub fn set_visual_prompt(&mut self, prompt: impl Into<String>) {
        self.visual_prompt = prompt.into();
    }

    pub(crate) fn set_hook(&mut self, is_hook: bool) {
        self.is_hook = is_hook;
    }
}
