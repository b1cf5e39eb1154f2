//! Shared data models for Script Director.
//!
//! This crate provides Serde-serializable types for:
//! - Script context and scene segments
//! - Hook tagging over an ordered segment list
//! - The single-session state store
//! - Output modes and render durations
//! - Plain-text prompt export

pub mod context;
pub mod error;
pub mod export;
pub mod hook;
pub mod mode;
pub mod render;
pub mod segment;
pub mod session;
pub mod warning;

// Re-export common types
pub use context::ScriptContext;
pub use error::{ModelError, ModelResult};
pub use export::{export_as_text, export_filename, sanitize_filename_part};
pub use hook::{tag_hooks, HOOK_SEGMENT_COUNT};
pub use mode::{HookDensity, OutputMode};
pub use render::{RenderDuration, RENDER_ASPECT_RATIO, RENDER_RESOLUTION};
pub use segment::{SceneSegment, SegmentId};
pub use session::{Session, SessionStore};
pub use warning::AnalysisWarning;
