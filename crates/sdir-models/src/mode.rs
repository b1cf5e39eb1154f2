//! Output mode and hook-region density.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Target medium for the generated prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Video generator: prompts carry motion descriptors
    #[default]
    Video,
    /// Still image generator: no motion descriptors
    Image,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Video => "video",
            OutputMode::Image => "image",
        }
    }

    /// Whether prompts for this mode must describe motion.
    pub fn requires_motion(&self) -> bool {
        matches!(self, OutputMode::Video)
    }

    /// Hook-region density used when none is configured explicitly.
    pub fn default_hook_density(&self) -> HookDensity {
        match self {
            OutputMode::Video => HookDensity::Punchy,
            OutputMode::Image => HookDensity::Standard,
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "video" => Ok(OutputMode::Video),
            "image" => Ok(OutputMode::Image),
            _ => Err(ModeParseError(s.to_string())),
        }
    }
}

/// How finely the opening (hook) region of a script is segmented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum HookDensity {
    /// Short punchy phrases, one per scene
    Punchy,
    /// Same paragraph-level segmentation as the rest of the script
    Standard,
}

impl HookDensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookDensity::Punchy => "punchy",
            HookDensity::Standard => "standard",
        }
    }
}

impl FromStr for HookDensity {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "punchy" => Ok(HookDensity::Punchy),
            "standard" => Ok(HookDensity::Standard),
            _ => Err(ModeParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown mode: {0}")]
pub struct ModeParseError(String);
