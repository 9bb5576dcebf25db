//! List Editor Glue
//!
//! Translates pointer gestures over the rendered rows into engine calls.
//! The editor owns the drag tracker and a handle to the list's engine; the
//! host UI forwards pointer events and re-renders from the engine's view.

use std::sync::Arc;

use snack_dragdrop::{reorder_ids, DragEnd, DragTracker, ItemRect, Pointer};

use crate::domain::DomainResult;
use crate::engine::ListEngine;

/// What a finished gesture turned into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    /// Plain click on the row at this index
    Clicked(usize),
    /// A reorder was submitted with this full id ordering
    Reordered(Vec<String>),
    /// Nothing happened (no drag, or dropped back on the own index)
    None,
}

/// Drag-to-reorder controller for one list's rows
pub struct ListEditor {
    engine: Arc<ListEngine>,
    tracker: DragTracker,
}

impl ListEditor {
    pub fn new(engine: Arc<ListEngine>) -> Self {
        Self {
            engine,
            tracker: DragTracker::new(),
        }
    }

    pub fn engine(&self) -> &Arc<ListEngine> {
        &self.engine
    }

    /// Pointer pressed on the row at `index`
    pub fn pointer_down(&mut self, index: usize, pointer: Pointer, rect: &ItemRect) {
        self.tracker.pointer_down(index, pointer, rect);
    }

    /// Pointer moved; returns the hover index for drop-indicator feedback
    pub fn pointer_move(&mut self, pointer: Pointer, rects: &[ItemRect]) -> Option<usize> {
        self.tracker.pointer_move(pointer, rects)
    }

    /// Top-left corner for the floating drag preview
    pub fn preview_origin(&self, pointer: Pointer) -> Option<Pointer> {
        self.tracker.preview_origin(pointer)
    }

    /// Pointer released. A drop on a new index submits a reorder with the
    /// full id ordering; a drop on the original index does nothing. While a
    /// batch add still has placeholders in the view, row indices do not map
    /// onto confirmed ids, so the drop is ignored.
    pub async fn pointer_up(&mut self) -> DomainResult<EditorAction> {
        match self.tracker.pointer_up() {
            DragEnd::Click(index) => Ok(EditorAction::Clicked(index)),
            DragEnd::Released => Ok(EditorAction::None),
            DragEnd::Drop { from, to } => {
                if self.engine.has_placeholders().await {
                    return Ok(EditorAction::None);
                }
                let ids = self.engine.confirmed_ids().await;
                if from >= ids.len() {
                    return Ok(EditorAction::None);
                }
                let order = reorder_ids(&ids, from, to);
                self.engine.reorder(&order).await?;
                Ok(EditorAction::Reordered(order))
            }
        }
    }
}
