//! Scene decomposition strategy.

use async_trait::async_trait;

use crate::contract::AnalysisResponse;
use crate::error::AnalysisResult;
use crate::template::PromptTemplate;

/// Turns a script into a context and an ordered list of scenes.
///
/// Implementations perform header classification, context extraction,
/// segmentation and prompt synthesis in one call. They return the raw
/// contract payload; validation and post-processing happen in
/// [`crate::ScriptAnalyzer`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SceneDecomposer: Send + Sync {
    /// Name of this decomposer for logging.
    fn name(&self) -> &'static str;

    /// Decompose `script` following `template`.
    async fn decompose(
        &self,
        script: &str,
        template: &PromptTemplate,
    ) -> AnalysisResult<AnalysisResponse>;
}
