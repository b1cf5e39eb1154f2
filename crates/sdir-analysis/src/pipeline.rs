//! Analysis pipeline.
//!
//! Runs one decomposition request and applies the deterministic
//! post-processing to its output:
//! 1. Reject empty scripts; short-circuit scripts that are only headers
//! 2. Validate the response contract
//! 3. Strip header lines from scene texts, drop header-only scenes
//! 4. Anchor city and era into every prompt
//! 5. Check that scene texts cover the narrative
//! 6. Assign segment ids and tag hooks
//!
//! The outcome is all-or-nothing: any error discards everything.

use std::sync::Arc;

use serde::Serialize;
use tracing::Instrument;

use sdir_models::{tag_hooks, AnalysisWarning, SceneSegment, ScriptContext};

use crate::config::AnalysisConfig;
use crate::decomposer::SceneDecomposer;
use crate::error::{AnalysisError, AnalysisResult};
use crate::headers::{has_narrative, narrative_content, normalize_whitespace, strip_header_lines};
use crate::logging::AnalysisLogger;
use crate::template::PromptTemplate;

/// Style guides longer than this are reported.
pub const MAX_STYLE_GUIDE_WORDS: usize = 4;

/// Post-processing switches.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    pub strict_coverage: bool,
    pub anchor_context: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            strict_coverage: false,
            anchor_context: true,
        }
    }
}

impl From<&AnalysisConfig> for AnalysisOptions {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            strict_coverage: config.strict_coverage,
            anchor_context: config.anchor_context,
        }
    }
}

/// A complete, validated analysis ready to be committed to a session.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub analysis_id: String,
    pub context: ScriptContext,
    pub segments: Vec<SceneSegment>,
    pub warnings: Vec<AnalysisWarning>,
}

/// Runs scripts through a [`SceneDecomposer`] and post-processes the result.
#[derive(Clone)]
pub struct ScriptAnalyzer {
    decomposer: Arc<dyn SceneDecomposer>,
    options: AnalysisOptions,
}

impl ScriptAnalyzer {
    pub fn new(decomposer: Arc<dyn SceneDecomposer>, options: AnalysisOptions) -> Self {
        Self {
            decomposer,
            options,
        }
    }

    pub fn decomposer_name(&self) -> &'static str {
        self.decomposer.name()
    }

    /// Analyze `script` with `template`.
    pub async fn analyze(
        &self,
        script: &str,
        template: &PromptTemplate,
    ) -> AnalysisResult<AnalysisOutcome> {
        let logger = AnalysisLogger::new(self.decomposer.name(), template.mode);
        let span = logger.span();

        async {
            let result = self.run(script, template, &logger).await;
            if let Err(e) = &result {
                logger.failed(e);
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        script: &str,
        template: &PromptTemplate,
        logger: &AnalysisLogger,
    ) -> AnalysisResult<AnalysisOutcome> {
        if script.trim().is_empty() {
            return Err(AnalysisError::EmptyScript);
        }

        logger.started(script.chars().count());

        if !has_narrative(script) {
            logger.header_only();
            return Ok(AnalysisOutcome {
                analysis_id: logger.analysis_id(),
                context: ScriptContext::placeholder(),
                segments: Vec::new(),
                warnings: Vec::new(),
            });
        }

        let response = self.decomposer.decompose(script, template).await?;
        let (context, scenes) = response.into_parts()?;
        logger.decomposed(&context, scenes.len());

        let mut warnings = Vec::new();

        let style_words = context.style_guide_word_count();
        if style_words > MAX_STYLE_GUIDE_WORDS {
            warnings.push(AnalysisWarning::LongStyleGuide { words: style_words });
        }

        let mut segments = Vec::with_capacity(scenes.len());
        for (scene_index, scene) in scenes.into_iter().enumerate() {
            let (text, removed) = strip_header_lines(&scene.text);
            let text = text.trim();

            if text.is_empty() {
                warnings.push(AnalysisWarning::HeaderSceneDropped {
                    scene_index,
                    text: scene.text.trim().to_string(),
                });
                continue;
            }
            if removed > 0 {
                warnings.push(AnalysisWarning::HeaderLinesStripped {
                    scene_index,
                    removed,
                });
            }

            let mut prompt = scene.visual_prompt.trim().to_string();
            if self.options.anchor_context {
                if let Some(anchored) = anchor_context(&context, &prompt) {
                    warnings.push(AnalysisWarning::ContextAnchored { scene_index });
                    prompt = anchored;
                }
            }

            segments.push(SceneSegment::new(text, prompt));
        }

        if segments.is_empty() {
            return Err(AnalysisError::contract(
                "no narrative scenes after header stripping",
            ));
        }

        if !covers_narrative(script, &segments) {
            if self.options.strict_coverage {
                return Err(AnalysisError::contract(
                    "scene texts do not reproduce the narrative content",
                ));
            }
            warnings.push(AnalysisWarning::CoverageDrift);
        }

        tag_hooks(&mut segments);

        for warning in &warnings {
            logger.warning(warning);
        }
        logger.completed(segments.len(), warnings.len());

        Ok(AnalysisOutcome {
            analysis_id: logger.analysis_id(),
            context,
            segments,
            warnings,
        })
    }
}

/// Prefix the era and/or city to `prompt` when it does not mention them.
///
/// Returns `None` when the prompt already carries both.
pub fn anchor_context(context: &ScriptContext, prompt: &str) -> Option<String> {
    let mut missing = Vec::new();
    if !context.mentions_era(prompt) {
        missing.push(context.detected_era());
    }
    if !context.mentions_city(prompt) {
        missing.push(context.detected_city());
    }

    if missing.is_empty() {
        None
    } else {
        Some(format!("{}. {}", missing.join(", "), prompt))
    }
}

/// True if the concatenated segment texts equal the header-free narrative,
/// ignoring whitespace differences.
pub fn covers_narrative(script: &str, segments: &[SceneSegment]) -> bool {
    let joined = segments
        .iter()
        .map(|s| s.original_text())
        .collect::<Vec<_>>()
        .join(" ");

    normalize_whitespace(&joined) == normalize_whitespace(&narrative_content(script))
}
