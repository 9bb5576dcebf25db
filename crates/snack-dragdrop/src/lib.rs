//! Snack DragDrop Utilities
//!
//! Pure-geometry drag-and-drop reorder tracking for vertical lists.
//! Uses a movement threshold to distinguish click from drag; the host UI
//! feeds pointer samples in and reads the discrete target index out, so
//! this crate carries no UI-framework bindings at all.

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: f64 = 5.0;

/// A pointer-position sample in list coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
}

/// Visual bounds of one list row
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ItemRect {
    pub fn midpoint_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// How a gesture ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragEnd {
    /// Pointer released without crossing the drag threshold
    Click(usize),
    /// Item dragged to a different index
    Drop { from: usize, to: usize },
    /// Drag ended without effect (dropped on own index, or no gesture)
    Released,
}

/// Pointer down on a row, not yet past the threshold
#[derive(Clone, Copy, Debug)]
struct PendingDrag {
    index: usize,
    start: Pointer,
    grab_offset: (f64, f64),
}

#[derive(Clone, Copy, Debug)]
struct ActiveDrag {
    index: usize,
    grab_offset: (f64, f64),
    hover: usize,
}

/// Tracks one drag gesture over a vertical list.
///
/// Feed it `pointer_down` / `pointer_move` / `pointer_up`; it projects the
/// pointer onto a hover index by comparing against row vertical midpoints
/// and reports the final target on release. All transient state is cleared
/// unconditionally on `pointer_up`, wherever the pointer ends up.
#[derive(Debug, Default)]
pub struct DragTracker {
    pending: Option<PendingDrag>,
    active: Option<ActiveDrag>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer pressed on the row at `index`. Records the pointer's offset
    /// within the row so a drag preview tracks under the grab point rather
    /// than by its corner.
    pub fn pointer_down(&mut self, index: usize, pointer: Pointer, rect: &ItemRect) {
        self.pending = Some(PendingDrag {
            index,
            start: pointer,
            grab_offset: (pointer.x - rect.left, pointer.y - rect.top),
        });
        self.active = None;
    }

    /// Pointer moved. Promotes a pending press to a drag once it crosses
    /// the movement threshold, then returns the current hover index —
    /// a read-only projection for visual feedback, nothing is committed.
    pub fn pointer_move(&mut self, pointer: Pointer, rects: &[ItemRect]) -> Option<usize> {
        if self.active.is_none() {
            let pending = self.pending?;
            let dx = (pointer.x - pending.start.x).abs();
            let dy = (pointer.y - pending.start.y).abs();
            if dx <= DRAG_THRESHOLD_PX && dy <= DRAG_THRESHOLD_PX {
                return None;
            }
            self.active = Some(ActiveDrag {
                index: pending.index,
                grab_offset: pending.grab_offset,
                hover: pending.index,
            });
        }

        let active = self.active.as_mut()?;
        active.hover = hover_index(pointer.y, rects);
        Some(active.hover)
    }

    /// Index of the row being dragged, if a drag is active
    pub fn dragging(&self) -> Option<usize> {
        self.active.map(|a| a.index)
    }

    /// Current hover index, if a drag is active
    pub fn hover_index(&self) -> Option<usize> {
        self.active.map(|a| a.hover)
    }

    /// Top-left corner for a drag preview that keeps the row under the
    /// pointer at the original grab point
    pub fn preview_origin(&self, pointer: Pointer) -> Option<Pointer> {
        let active = self.active?;
        Some(Pointer {
            x: pointer.x - active.grab_offset.0,
            y: pointer.y - active.grab_offset.1,
        })
    }

    /// Pointer released. Clears all tracking state and reports how the
    /// gesture ended; dropping a row back on its own index is `Released`.
    pub fn pointer_up(&mut self) -> DragEnd {
        let pending = self.pending.take();
        let active = self.active.take();
        match (active, pending) {
            (Some(a), _) if a.hover != a.index => DragEnd::Drop {
                from: a.index,
                to: a.hover,
            },
            (Some(_), _) => DragEnd::Released,
            (None, Some(p)) => DragEnd::Click(p.index),
            (None, None) => DragEnd::Released,
        }
    }
}

/// Discrete target index for a pointer at height `y`: the number of row
/// midpoints above it, clamped to the last row for drops past the end.
fn hover_index(y: f64, rects: &[ItemRect]) -> usize {
    if rects.is_empty() {
        return 0;
    }
    let crossed = rects.iter().filter(|r| r.midpoint_y() < y).count();
    crossed.min(rects.len() - 1)
}

/// Full new ordering after moving `from` to `to`; `to` past the end clamps
/// to the last position.
pub fn reorder_ids<T: Clone>(ids: &[T], from: usize, to: usize) -> Vec<T> {
    let mut out = ids.to_vec();
    if from >= out.len() {
        return out;
    }
    let moved = out.remove(from);
    let to = to.min(out.len());
    out.insert(to, moved);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<ItemRect> {
        (0..n)
            .map(|i| ItemRect {
                left: 0.0,
                top: i as f64 * 40.0,
                width: 300.0,
                height: 40.0,
            })
            .collect()
    }

    fn at(x: f64, y: f64) -> Pointer {
        Pointer { x, y }
    }

    #[test]
    fn test_small_movement_stays_a_click() {
        let rects = rows(3);
        let mut tracker = DragTracker::new();
        tracker.pointer_down(1, at(10.0, 50.0), &rects[1]);

        assert_eq!(tracker.pointer_move(at(12.0, 53.0), &rects), None);
        assert_eq!(tracker.dragging(), None);
        assert_eq!(tracker.pointer_up(), DragEnd::Click(1));
    }

    #[test]
    fn test_threshold_promotes_to_drag() {
        let rects = rows(3);
        let mut tracker = DragTracker::new();
        tracker.pointer_down(0, at(10.0, 10.0), &rects[0]);

        let hover = tracker.pointer_move(at(10.0, 90.0), &rects);
        assert_eq!(hover, Some(2));
        assert_eq!(tracker.dragging(), Some(0));
        assert_eq!(tracker.pointer_up(), DragEnd::Drop { from: 0, to: 2 });
    }

    #[test]
    fn test_hover_follows_midpoints() {
        let rects = rows(4);
        // Midpoints at 20, 60, 100, 140.
        assert_eq!(hover_index(10.0, &rects), 0);
        assert_eq!(hover_index(25.0, &rects), 1);
        assert_eq!(hover_index(105.0, &rects), 3);
    }

    #[test]
    fn test_hover_clamps_past_the_end() {
        let rects = rows(3);
        assert_eq!(hover_index(10_000.0, &rects), 2);
        assert_eq!(hover_index(10.0, &[]), 0);
    }

    #[test]
    fn test_drop_on_own_index_is_released() {
        let rects = rows(3);
        let mut tracker = DragTracker::new();
        tracker.pointer_down(1, at(10.0, 50.0), &rects[1]);
        tracker.pointer_move(at(30.0, 58.0), &rects);
        assert_eq!(tracker.dragging(), Some(1));
        assert_eq!(tracker.pointer_up(), DragEnd::Released);
    }

    #[test]
    fn test_pointer_up_clears_all_state() {
        let rects = rows(3);
        let mut tracker = DragTracker::new();
        tracker.pointer_down(0, at(5.0, 5.0), &rects[0]);
        tracker.pointer_move(at(5.0, 90.0), &rects);
        tracker.pointer_up();

        assert_eq!(tracker.dragging(), None);
        assert_eq!(tracker.hover_index(), None);
        assert_eq!(tracker.preview_origin(at(0.0, 0.0)), None);
        // A second release with no gesture is harmless.
        assert_eq!(tracker.pointer_up(), DragEnd::Released);
    }

    #[test]
    fn test_preview_tracks_grab_offset() {
        let rects = rows(2);
        let mut tracker = DragTracker::new();
        tracker.pointer_down(0, at(120.0, 25.0), &rects[0]);
        tracker.pointer_move(at(120.0, 70.0), &rects);

        let origin = tracker.preview_origin(at(120.0, 70.0)).unwrap();
        assert_eq!(origin, at(0.0, 45.0));
    }

    #[test]
    fn test_reorder_ids() {
        let ids = vec!["a", "b", "c", "d"];
        assert_eq!(reorder_ids(&ids, 0, 2), vec!["b", "c", "a", "d"]);
        assert_eq!(reorder_ids(&ids, 3, 0), vec!["d", "a", "b", "c"]);
        assert_eq!(reorder_ids(&ids, 1, 99), vec!["a", "c", "d", "b"]);
        assert_eq!(reorder_ids(&ids, 99, 0), ids);
    }
}
