//! Plain-text export of scene prompts.

use crate::context::ScriptContext;
use crate::segment::SceneSegment;

/// Separator between prompts: exactly one blank line.
pub const PROMPT_SEPARATOR: &str = "\n\n";

/// Filename stem used when no city is known.
pub const FALLBACK_FILENAME_STEM: &str = "script";

/// Suffix appended to every export filename.
pub const EXPORT_FILENAME_SUFFIX: &str = "_veo_prompts.txt";

/// Join the prompts of `segments`, in order and verbatim, with one blank
/// line between them. No numbering, no trailing separator.
pub fn export_as_text(segments: &[SceneSegment]) -> String {
    segments
        .iter()
        .map(|s| s.visual_prompt())
        .collect::<Vec<_>>()
        .join(PROMPT_SEPARATOR)
}

/// Download filename for an export, derived from the context city.
pub fn export_filename(context: Option<&ScriptContext>) -> String {
    let stem = context
        .map(|c| sanitize_filename_part(c.detected_city()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_FILENAME_STEM.to_string());

    format!("{stem}{EXPORT_FILENAME_SUFFIX}")
}

/// Make `raw` safe as a filename component.
///
/// Keeps alphanumerics (any script), `-` and `_`. Whitespace runs become a
/// single `_`; everything else is dropped. Leading and trailing `_` are
/// trimmed, so the result may be empty.
pub fn sanitize_filename_part(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_underscore = false;

    for c in raw.chars() {
        if c.is_whitespace() || c == '_' {
            pending_underscore = true;
        } else if c.is_alphanumeric() || c == '-' {
            if pending_underscore && !out.is_empty() {
                out.push('_');
            }
            pending_underscore = false;
            out.push(c);
        }
    }

    out
}
