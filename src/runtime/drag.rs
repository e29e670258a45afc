//! Ambient drag-and-drop state
//!
//! A drag is short-lived: it begins on drag start and must be cleared exactly
//! once, on drop, on drag end, or when the guard that owns it goes away.

use serde::{Deserialize, Serialize};

use crate::core::block::BlockId;

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DragSource {
    /// An existing block, by id
    Block(BlockId),
    /// A library template, by template id
    Library(String),
}

/// Which source is in flight and which block it hovers over
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DragState {
    source: Option<DragSource>,
    hovered: Option<BlockId>,
}

impl DragState {
    /// Begin a drag, replacing any drag still in flight
    pub fn begin(&mut self, source: DragSource) {
        self.source = Some(source);
        self.hovered = None;
    }

    /// Record the current drop target; ignored when nothing is dragged
    pub fn hover(&mut self, target: Option<BlockId>) {
        if self.source.is_some() {
            self.hovered = target;
        }
    }

    /// Take the source out and clear all state
    pub fn take(&mut self) -> Option<DragSource> {
        self.hovered = None;
        self.source.take()
    }

    /// Clear all state; returns whether a drag was in flight
    pub fn clear(&mut self) -> bool {
        self.take().is_some()
    }

    /// Whether a drag is in flight
    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }

    /// The source in flight
    pub fn source(&self) -> Option<&DragSource> {
        self.source.as_ref()
    }

    /// The hovered drop target
    pub fn hovered(&self) -> Option<&BlockId> {
        self.hovered.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_reports_once() {
        let mut state = DragState::default();
        state.begin(DragSource::Block("a".into()));
        state.hover(Some("b".into()));
        assert!(state.clear());
        assert!(!state.clear());
        assert_eq!(state, DragState::default());
    }

    #[test]
    fn test_hover_without_drag_is_ignored() {
        let mut state = DragState::default();
        state.hover(Some("b".into()));
        assert!(state.hovered().is_none());
    }

    #[test]
    fn test_begin_resets_hover() {
        let mut state = DragState::default();
        state.begin(DragSource::Library("ebay-title".into()));
        state.hover(Some("x".into()));
        state.begin(DragSource::Block("y".into()));
        assert!(state.hovered().is_none());
        assert_eq!(state.source(), Some(&DragSource::Block("y".into())));
    }
}
