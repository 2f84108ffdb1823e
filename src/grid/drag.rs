// Drag selection engine
// Turns pointer/touch gestures into a provisional rectangular slot region

use super::GridCoord;

/// Whether a gesture adds slots to or removes them from the selection.
/// Decided once, at pointer-down, from the anchor cell's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Add,
    Remove,
}

/// Inclusive rectangular region of grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpan {
    pub min_day: usize,
    pub max_day: usize,
    pub min_time: usize,
    pub max_time: usize,
}

impl SlotSpan {
    fn between(a: GridCoord, b: GridCoord) -> Self {
        Self {
            min_day: a.day_index.min(b.day_index),
            max_day: a.day_index.max(b.day_index),
            min_time: a.time_index.min(b.time_index),
            max_time: a.time_index.max(b.time_index),
        }
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.day_index >= self.min_day
            && coord.day_index <= self.max_day
            && coord.time_index >= self.min_time
            && coord.time_index <= self.max_time
    }

    /// Every cell in the span, row by row
    pub fn coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (self.min_day..=self.max_day).flat_map(move |day| {
            (self.min_time..=self.max_time).map(move |time| GridCoord::new(day, time))
        })
    }
}

/// How the editor should apply a finished gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Plain click in edit mode: flip one slot's membership
    ToggleSlot(GridCoord),
    /// Drag in edit mode: apply `mode` across the whole span
    CommitSpan { span: SlotSpan, mode: DragMode },
    /// Click in view mode: reposition the shared selected-time cursor,
    /// leaving the selection untouched
    TimeSelected(GridCoord),
    /// Gesture that edits nothing (e.g. a drag while in view mode)
    Ignored,
}

/// The in-flight gesture: anchor cell, current cursor cell, add/remove mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDrag {
    pub anchor: GridCoord,
    pub cursor: GridCoord,
    pub mode: DragMode,
    moved: bool,
}

/// Two-state machine (idle / dragging) over pointer events. Touch events
/// are forwarded here after coordinate hit-testing. The pending rectangle
/// is exposed for preview rendering but never mutates any selection; the
/// editor applies the outcome returned by [`DragSelection::pointer_up`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DragSelection {
    pending: Option<PendingDrag>,
}

impl DragSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingDrag> {
        self.pending.as_ref()
    }

    /// Idle -> Dragging. `anchor_selected` is whether the anchor slot is in
    /// the working selection right now; a selected anchor makes this a
    /// remove gesture, otherwise an add gesture.
    pub fn pointer_down(&mut self, coord: GridCoord, anchor_selected: bool) {
        let mode = if anchor_selected {
            DragMode::Remove
        } else {
            DragMode::Add
        };
        self.pending = Some(PendingDrag {
            anchor: coord,
            cursor: coord,
            mode,
            moved: false,
        });
    }

    /// Update the cursor cell. Moves onto a different cell mark the gesture
    /// as a real drag rather than a click.
    pub fn pointer_move(&mut self, coord: GridCoord) {
        if let Some(pending) = self.pending.as_mut() {
            if coord != pending.cursor {
                pending.moved = true;
            }
            pending.cursor = coord;
        }
    }

    /// Dragging -> Idle. Resolves the gesture:
    /// - no movement, view mode with a time-selection target: the click
    ///   repositions the shared cursor and the selection change is aborted;
    /// - no movement, edit mode: toggle the single anchor slot;
    /// - movement in edit mode: commit the rectangle under the drag mode;
    /// - movement in view mode: nothing (view mode never edits).
    pub fn pointer_up(&mut self, edit_mode: bool, time_select_enabled: bool) -> DragOutcome {
        let Some(pending) = self.pending.take() else {
            return DragOutcome::Ignored;
        };

        let is_click = !pending.moved && pending.anchor == pending.cursor;
        if is_click {
            if time_select_enabled && !edit_mode {
                return DragOutcome::TimeSelected(pending.anchor);
            }
            if edit_mode {
                return DragOutcome::ToggleSlot(pending.anchor);
            }
            return DragOutcome::Ignored;
        }

        if !edit_mode {
            return DragOutcome::Ignored;
        }

        DragOutcome::CommitSpan {
            span: SlotSpan::between(pending.anchor, pending.cursor),
            mode: pending.mode,
        }
    }

    /// Abort without resolving (e.g. pointer left the grid surface)
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Effective visual state of a cell during a drag: the persisted state
    /// overridden by the pending rectangle. Cells inside an add-rectangle
    /// render selected, cells inside a remove-rectangle render unselected.
    pub fn effective_selected(&self, coord: GridCoord, persisted: bool) -> bool {
        match &self.pending {
            Some(pending) if SlotSpan::between(pending.anchor, pending.cursor).contains(coord) => {
                pending.mode == DragMode::Add
            }
            _ => persisted,
        }
    }
}
