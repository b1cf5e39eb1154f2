//! Structured analysis logging.
//!
//! One [`AnalysisLogger`] is created per analysis. Its span carries the
//! analysis id, the decomposer and the output mode; events add typed fields
//! (`chars`, `scenes`, `warnings`, `kind`) so runs can be filtered without
//! parsing messages.

use tracing::{error, info, warn, Span};
use uuid::Uuid;

use sdir_models::{AnalysisWarning, OutputMode, ScriptContext};

use crate::error::AnalysisError;

#[derive(Debug, Clone)]
pub struct AnalysisLogger {
    analysis_id: Uuid,
    decomposer: &'static str,
    mode: OutputMode,
}

impl AnalysisLogger {
    pub fn new(decomposer: &'static str, mode: OutputMode) -> Self {
        Self {
            analysis_id: Uuid::new_v4(),
            decomposer,
            mode,
        }
    }

    /// Id reported back to the caller with the outcome.
    pub fn analysis_id(&self) -> String {
        self.analysis_id.to_string()
    }

    /// Span under which every event of this analysis is emitted.
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "analysis",
            analysis_id = %self.analysis_id,
            decomposer = self.decomposer,
            mode = %self.mode,
        )
    }

    pub fn started(&self, chars: usize) {
        info!(chars, "Analysis started");
    }

    pub fn header_only(&self) {
        info!(scenes = 0, "Script has no narrative, skipping backend");
    }

    pub fn decomposed(&self, context: &ScriptContext, scenes: usize) {
        info!(
            scenes,
            city = context.detected_city(),
            era = context.detected_era(),
            "Backend returned scenes"
        );
    }

    pub fn warning(&self, warning: &AnalysisWarning) {
        warn!(kind = warning.kind(), "{}", warning);
    }

    pub fn completed(&self, scenes: usize, warnings: usize) {
        info!(scenes, warnings, "Analysis completed");
    }

    pub fn failed(&self, err: &AnalysisError) {
        error!(kind = err.kind(), error = %err, "Analysis failed");
    }
}
