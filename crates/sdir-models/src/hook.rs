//! Hook tagging.

use crate::segment::SceneSegment;

/// Number of leading segments flagged as hook segments.
pub const HOOK_SEGMENT_COUNT: usize = 10;

/// Flag the first `min(HOOK_SEGMENT_COUNT, len)` segments as hooks and clear
/// the flag on all others. Idempotent.
pub fn tag_hooks(segments: &mut [SceneSegment]) {
    for (ordinal, segment) in segments.iter_mut().enumerate() {
        segment.set_hook(ordinal < HOOK_SEGMENT_COUNT);
    }
}
