//! Render request constraints.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolution sent with every render request.
pub const RENDER_RESOLUTION: &str = "720p";

/// Aspect ratio sent with every render request (16:9).
pub const RENDER_ASPECT_RATIO: &str = "landscape";

/// Clip durations accepted by the render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum RenderDuration {
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "15")]
    Fifteen,
}

impl RenderDuration {
    /// Snap a requested duration to the nearest allowed value:
    /// `<= 8` gives 6s, `<= 12` gives 10s, anything else 15s.
    pub fn from_requested(seconds: f64) -> Self {
        if seconds <= 8.0 {
            RenderDuration::Six
        } else if seconds <= 12.0 {
            RenderDuration::Ten
        } else {
            RenderDuration::Fifteen
        }
    }

    pub fn seconds(&self) -> u32 {
        match self {
            RenderDuration::Six => 6,
            RenderDuration::Ten => 10,
            RenderDuration::Fifteen => 15,
        }
    }

    /// Form value expected by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderDuration::Six => "6",
            RenderDuration::Ten => "10",
            RenderDuration::Fifteen => "15",
        }
    }
}

impl fmt::Display for RenderDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
