//! Script analysis.
//!
//! This crate provides:
//! - The structural header classifier
//! - The instruction template sent to the generative backend
//! - The backend response contract and its validation
//! - The `SceneDecomposer` strategy and its Gemini implementation
//! - The analysis pipeline (header stripping, context anchoring, ids, hooks)

pub mod config;
pub mod contract;
pub mod decomposer;
pub mod error;
pub mod gemini;
pub mod headers;
pub mod logging;
pub mod pipeline;
pub mod template;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use config::AnalysisConfig;
pub use contract::{AnalysisResponse, ContextPayload, ScenePayload};
pub use decomposer::SceneDecomposer;
pub use error::{AnalysisError, AnalysisResult};
pub use gemini::GeminiClient;
pub use logging::AnalysisLogger;
pub use pipeline::{AnalysisOptions, AnalysisOutcome, ScriptAnalyzer};
pub use template::PromptTemplate;
