//! Single-session state store.
//!
//! Holds the context and ordered scene list of the most recent successful
//! analysis. The whole session is swapped at once; the only partial update
//! is a prompt edit on a single segment.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::context::ScriptContext;
use crate::hook::tag_hooks;
use crate::segment::{SceneSegment, SegmentId};

/// Snapshot of the session as exposed to clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Session {
    /// Shared context of the last analysis, absent before the first one
    pub context: Option<ScriptContext>,

    /// Scenes in narrative order
    pub segments: Vec<SceneSegment>,

    /// An analysis is currently in flight
    pub processing: bool,

    /// When the current scenes were committed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<DateTime<Utc>>,
}

/// Owner of the one [`Session`] of a running instance.
#[derive(Debug, Default)]
pub struct SessionStore {
    session: Session,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of the current session.
    pub fn snapshot(&self) -> Session {
        self.session.clone()
    }

    pub fn context(&self) -> Option<&ScriptContext> {
        self.session.context.as_ref()
    }

    pub fn segments(&self) -> &[SceneSegment] {
        &self.session.segments
    }

    pub fn segment(&self, id: &SegmentId) -> Option<&SceneSegment> {
        self.session.segments.iter().find(|s| s.id() == id)
    }

    pub fn is_processing(&self) -> bool {
        self.session.processing
    }

    /// Mark an analysis as started. Returns `false` if one is already running.
    pub fn begin_processing(&mut self) -> bool {
        if self.session.processing {
            return false;
        }
        self.session.processing = true;
        true
    }

    pub fn end_processing(&mut self) {
        self.session.processing = false;
    }

    /// Swap in the result of a complete analysis.
    ///
    /// Hook flags are re-derived from the given order so the stored list
    /// always satisfies the hook invariant.
    pub fn replace_all(&mut self, context: ScriptContext, mut segments: Vec<SceneSegment>) {
        tag_hooks(&mut segments);
        self.session.context = Some(context);
        self.session.segments = segments;
        self.session.analyzed_at = Some(Utc::now());
    }

    /// Replace the prompt of one segment.
    ///
    /// Returns `false` and leaves the session untouched if `id` is unknown.
    pub fn update_segment_prompt(&mut self, id: &SegmentId, prompt: impl Into<String>) -> bool {
        match self.session.segments.iter_mut().find(|s| s.id() == id) {
            Some(segment) => {
                segment.set_visual_prompt(prompt);
                true
            }
            None => false,
        }
    }

    /// Discard context and scenes (back to the input state).
    pub fn clear(&mut self) {
        self.session.context = None;
        self.session.segments.clear();
        self.session.analyzed_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HOOK_SEGMENT_COUNT;

    fn context() -> ScriptContext {
        ScriptContext::new("London", "1850", "foggy Victorian realism").unwrap()
    }

    fn segments(n: usize) -> Vec<SceneSegment> {
        (0..n)
            .map(|i| SceneSegment::new(format!("text {i}"), format!("prompt {i}")))
            .collect()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = SessionStore::new();
        let session = store.snapshot();
        assert!(session.context.is_none());
        assert!(session.segments.is_empty());
        assert!(!session.processing);
    }

    #[test]
    fn test_replace_all_swaps_and_tags_hooks() {
        let mut store = SessionStore::new();
        store.replace_all(context(), segments(3));
        store.replace_all(context(), segments(12));

        let session = store.snapshot();
        assert_eq!(session.segments.len(), 12);
        assert!(session.analyzed_at.is_some());
        let hooks = session.segments.iter().filter(|s| s.is_hook()).count();
        assert_eq!(hooks, HOOK_SEGMENT_COUNT);
    }

    #[test]
    fn test_update_changes_only_target_prompt() {
        let mut store = SessionStore::new();
        store.replace_all(context(), segments(12));
        let before = store.snapshot();
        let target = before.segments[4].id().clone();

        assert!(store.update_segment_prompt(&target, "edited"));

        let after = store.snapshot();
        assert_eq!(after.segments.len(), before.segments.len());
        for (old, new) in before.segments.iter().zip(after.segments.iter()) {
            assert_eq!(old.id(), new.id());
            assert_eq!(old.original_text(), new.original_text());
            assert_eq!(old.is_hook(), new.is_hook());
            if old.id() == &target {
                assert_eq!(new.visual_prompt(), "edited");
            } else {
                assert_eq!(old.visual_prompt(), new.visual_prompt());
            }
        }
        assert_eq!(before.context, after.context);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = SessionStore::new();
        store.replace_all(context(), segments(2));
        let before = store.snapshot();

        assert!(!store.update_segment_prompt(&SegmentId::from_string("missing"), "x"));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_processing_flag_is_exclusive() {
        let mut store = SessionStore::new();
        assert!(store.begin_processing());
        assert!(!store.begin_processing());
        store.end_processing();
        assert!(store.begin_processing());
    }

    #[test]
    fn test_clear_keeps_processing_flag() {
        let mut store = SessionStore::new();
        store.replace_all(context(), segments(2));
        store.begin_processing();
        store.clear();

        assert!(store.context().is_none());
        assert!(store.segments().is_empty());
        assert!(store.is_processing());
    }

    #[test]
    fn test_segment_lookup() {
        let mut store = SessionStore::new();
        store.replace_all(context(), segments(3));
        let id = store.segments()[1].id().clone();
        assert_eq!(store.segment(&id).map(|s| s.original_text()), Some("text 1"));
        assert!(store.segment(&SegmentId::new()).is_none());
    }
}
