//! Non-fatal analysis findings.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A post-processing finding that did not fail the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisWarning {
    /// A returned scene consisted only of structural headers and was dropped
    HeaderSceneDropped { scene_index: usize, text: String },
    /// Header lines were removed from inside a returned scene
    HeaderLinesStripped { scene_index: usize, removed: usize },
    /// City and/or era were prefixed to a prompt that lacked them
    ContextAnchored { scene_index: usize },
    /// Scene texts do not reconstruct the narrative content
    CoverageDrift,
    /// Style guide is longer than a short phrase
    LongStyleGuide { words: usize },
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisWarning::HeaderSceneDropped { scene_index, text } => {
                write!(f, "scene {scene_index} was a structural header ({text}) and was dropped")
            }
            AnalysisWarning::HeaderLinesStripped { scene_index, removed } => {
                write!(f, "removed {removed} header line(s) from scene {scene_index}")
            }
            AnalysisWarning::ContextAnchored { scene_index } => {
                write!(f, "prefixed city/era to the prompt of scene {scene_index}")
            }
            AnalysisWarning::CoverageDrift => {
                write!(f, "scene texts do not reconstruct the narrative")
            }
            AnalysisWarning::LongStyleGuide { words } => {
                write!(f, "style guide has {words} words")
            }
        }
    }
}

impl AnalysisWarning {
    /// Serialized `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisWarning::HeaderSceneDropped { .. } => "header_scene_dropped",
            AnalysisWarning::HeaderLinesStripped { .. } => "header_lines_stripped",
            AnalysisWarning::ContextAnchored { .. } => "context_anchored",
            AnalysisWarning::CoverageDrift => "coverage_drift",
            AnalysisWarning::LongStyleGuide { .. } => "long_style_guide",
        }
    }
}
