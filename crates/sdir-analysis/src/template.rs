//! Instruction template for the generative backend.
//!
//! One template covers both output modes. The mode only switches the motion
//! facet on or off; the hook density only changes how the opening of the
//! script is segmented. Header, context and segmentation rules are shared.

use sdir_models::{HookDensity, OutputMode, HOOK_SEGMENT_COUNT};

/// Markers listed as examples in the header rule.
const EXAMPLE_MARKERS: &[&str] = &[
    "[HOOK]",
    "[INTRO DANDO INDICATIVOS CURIOSOS SOBRE O TEMA]",
    "[DESENVOLVIMENTO]",
    "[ESPECIALISTAS FALANDO]",
    "[GATILHO DE CURIOSIDADE]",
    "[FECHAMENTO/CONCLUSAO]",
];

/// Parameters of the analysis instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub mode: OutputMode,
    pub hook_density: HookDensity,
}

impl PromptTemplate {
    /// Template for `mode` with that mode's default hook density.
    pub fn for_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            hook_density: mode.default_hook_density(),
        }
    }

    pub fn with_hook_density(mut self, density: HookDensity) -> Self {
        self.hook_density = density;
        self
    }

    /// Full instruction text with the script embedded.
    pub fn render(&self, script: &str) -> String {
        let markers = EXAMPLE_MARKERS
            .iter()
            .map(|m| format!("  - {m}"))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are an art director and cinematographer for high-budget historical productions.

INPUT SCRIPT:
"""
{script}
"""

TASK: break the script into scene-by-scene {target} prompts.

STEP 1 - CONTEXT
- Identify the single most prominent CITY and ERA mentioned anywhere in the narration. If several appear, pick the most prominent; break ties by first mention.
- If no city or era can be identified, still return a short descriptive placeholder. Never return an empty field.
- Summarize the overall look in a visual style guide of 3 to 4 words (for example "foggy Victorian realism").

STEP 2 - SEGMENTATION
- Structural headers are lines entirely enclosed in square brackets. Ignore them completely: no scene, no prompt. Examples:
{markers}
  - Any other line enclosed in square brackets.
- A line with text outside the brackets, or with nested or unbalanced brackets, is narration and must be kept.
- Split the remaining narration into contiguous, non-overlapping scenes in the original order. Together the scene texts must reproduce the narration exactly: copy the text verbatim, drop nothing, repeat nothing.
- {density}

STEP 3 - PROMPTS
- One prompt per scene, in English only, regardless of the script language.
- Compose each prompt from five parts in this order: [Subject/Action/Movement] + [Environment/Era details] + [Lighting/Mood] + [Camera/Lens] + [Small physical details taken from the scene text].
- {motion}
- The generator is stateless between scenes: repeat the ERA and the CITY explicitly in every single prompt.
- Framing: 16:9 cinematic aspect ratio.
- Style: photorealistic, cinematic, highly detailed.

OUTPUT (JSON only):
{{
  "context": {{ "detected_city": "...", "detected_era": "...", "visual_style_guide": "..." }},
  "scenes": [ {{ "text": "verbatim narration", "visual_prompt": "..." }} ]
}}
"#,
            script = script,
            target = self.target_label(),
            markers = markers,
            density = self.density_instruction(),
            motion = self.motion_instruction(),
        )
    }

    fn target_label(&self) -> &'static str {
        match self.mode {
            OutputMode::Video => "cinematic VIDEO",
            OutputMode::Image => "cinematic still IMAGE",
        }
    }

    fn density_instruction(&self) -> String {
        match self.hook_density {
            HookDensity::Punchy => format!(
                "The opening of the script (the hook region, roughly the first {HOOK_SEGMENT_COUNT} scenes) must be cut into short, punchy phrases, one phrase per scene. Segment the rest at paragraph level."
            ),
            HookDensity::Standard => {
                "Segment the whole script at paragraph level, one narrative beat per scene.".to_string()
            }
        }
    }

    fn motion_instruction(&self) -> &'static str {
        if self.mode.requires_motion() {
            "Describe subtle motion in every prompt (slow pan, camera drift, rain falling, smoke rising, crowd moving)."
        } else {
            "This is a still image: describe a frozen moment and do not describe camera or subject motion."
        }
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::for_mode(OutputMode::default())
    }
}
