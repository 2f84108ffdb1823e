// Availability editor
// Composes grid geometry, the drag machine and the reconciliation
// controller into one editing session for the viewer's own availability

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::models::meeting::{AvailabilityRange, Participant};
use crate::models::slot::slot_duration;

use super::drag::{DragOutcome, DragSelection};
use super::geometry::{CellMetrics, GridGeometry, SLOTS_PER_DAY};
use super::heatmap::{self, displayed_count};
use super::reconcile::{ReconcileController, SaveRequest, SaveStatus};
use super::GridCoord;

/// What the caller should do after a pointer-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    None,
    /// Move the shared selected-time cursor to this instant
    SelectTime(DateTime<Utc>),
}

/// A contiguous run of effectively-selected slots within one day row,
/// `[start_slot, end_slot)`, used for the selection overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRun {
    pub start_slot: usize,
    pub end_slot: usize,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// One participant's availability editing session. Lives while the editor
/// is open and is discarded on close; pending debounce state dies with it.
#[derive(Debug, Clone)]
pub struct AvailabilityEditor {
    participant_id: String,
    geometry: GridGeometry,
    drag: DragSelection,
    controller: ReconcileController,
    heat: HashMap<DateTime<Utc>, u32>,
    edit_mode: bool,
    time_select_enabled: bool,
}

impl AvailabilityEditor {
    pub fn new(
        participant_id: impl Into<String>,
        zone: Tz,
        now: DateTime<Utc>,
        initial: &[AvailabilityRange],
    ) -> Self {
        Self {
            participant_id: participant_id.into(),
            geometry: GridGeometry::new(zone, now),
            drag: DragSelection::new(),
            controller: ReconcileController::new(initial),
            heat: HashMap::new(),
            edit_mode: true,
            time_select_enabled: false,
        }
    }

    pub fn participant_id(&self) -> &str {
        &self.participant_id
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// View/edit gate: in view mode pointer interactions only move the
    /// shared selected-time cursor
    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        self.edit_mode = edit_mode;
    }

    /// Whether clicks may reposition the shared selected time
    pub fn set_time_select_enabled(&mut self, enabled: bool) {
        self.time_select_enabled = enabled;
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.controller.has_unsaved_changes()
    }

    pub fn save_status(&self) -> SaveStatus {
        self.controller.save_status()
    }

    // --- pointer / touch input ---------------------------------------

    pub fn pointer_down(&mut self, coord: GridCoord) {
        let anchor_selected = self
            .controller
            .is_selected(self.geometry.slot_instant(coord));
        self.drag.pointer_down(coord, anchor_selected);
        self.controller.begin_drag();
    }

    pub fn pointer_move(&mut self, coord: GridCoord) {
        self.drag.pointer_move(coord);
    }

    /// Touch-move does not fire per-cell enter events; resolve the touched
    /// point to a cell and forward it as a pointer move
    pub fn touch_move(&mut self, metrics: &CellMetrics, x: f32, y: f32) {
        if let Some(coord) = metrics.hit_test(x, y) {
            self.pointer_move(coord);
        }
    }

    pub fn pointer_up(&mut self, now: Instant) -> EditorAction {
        let outcome = self.drag.pointer_up(self.edit_mode, self.time_select_enabled);
        let action = match outcome {
            DragOutcome::ToggleSlot(coord) => {
                self.controller
                    .toggle_slot(self.geometry.slot_instant(coord), now);
                EditorAction::None
            }
            DragOutcome::CommitSpan { span, mode } => {
                let geometry = self.geometry;
                let slots = span.coords().map(|c| geometry.slot_instant(c));
                self.controller.apply_span(slots, mode, now);
                EditorAction::None
            }
            DragOutcome::TimeSelected(coord) => {
                EditorAction::SelectTime(self.geometry.slot_instant(coord))
            }
            DragOutcome::Ignored => EditorAction::None,
        };
        self.controller.end_drag(now);
        action
    }

    /// Pointer left the grid: treat as pointer-up (original grid commits
    /// on mouse-leave as well, so a drag is never left dangling)
    pub fn pointer_leave(&mut self, now: Instant) -> EditorAction {
        self.pointer_up(now)
    }

    // --- save / reconciliation passthrough ----------------------------

    /// Advance timers; returns a save request when the debounce fires
    pub fn poll(&mut self, now: Instant) -> Option<SaveRequest> {
        self.controller.poll(now)
    }

    pub fn save_succeeded(&mut self, now: Instant) {
        self.controller.save_succeeded(now);
    }

    pub fn save_failed(&mut self) {
        self.controller.save_failed();
    }

    /// Server-confirmed availability for this participant arrived
    pub fn apply_authoritative(&mut self, ranges: &[AvailabilityRange]) {
        self.controller.apply_authoritative(ranges);
    }

    // --- render-model queries -----------------------------------------

    /// Recompute overlap counts from the roster (viewer excluded)
    pub fn refresh_heatmap(&mut self, participants: &[Participant]) {
        self.heat = heatmap::overlap_counts(&self.participant_id, participants);
    }

    /// Effective state: working selection with the uncommitted drag
    /// rectangle applied on top
    pub fn effective_selected(&self, coord: GridCoord) -> bool {
        let persisted = self
            .controller
            .is_selected(self.geometry.slot_instant(coord));
        self.drag.effective_selected(coord, persisted)
    }

    /// The count shown in a cell: others plus the viewer's effective state
    pub fn cell_count(&self, coord: GridCoord) -> u32 {
        let slot = self.geometry.slot_instant(coord);
        displayed_count(&self.heat, slot, self.effective_selected(coord))
    }

    /// Contiguous effectively-selected runs for one day row, for overlay
    /// rendering. Pending drag state is merged in on the fly; the working
    /// selection itself is untouched until pointer-up commits.
    pub fn day_runs(&self, day_index: usize) -> Vec<SelectionRun> {
        let mut runs = Vec::new();
        let mut current: Option<SelectionRun> = None;

        for time_index in 0..SLOTS_PER_DAY {
            let coord = GridCoord::new(day_index, time_index);
            let slot_start = self.geometry.slot_instant(coord);
            let slot_end = slot_start + slot_duration();

            if self.effective_selected(coord) {
                match current.as_mut() {
                    Some(run) => {
                        run.end_slot = time_index + 1;
                        run.end_time = slot_end;
                    }
                    None => {
                        current = Some(SelectionRun {
                            start_slot: time_index,
                            end_slot: time_index + 1,
                            start_time: slot_start,
                            end_time: slot_end,
                        });
                    }
                }
            } else if let Some(run) = current.take() {
                runs.push(run);
            }
        }
        if let Some(run) = current {
            runs.push(run);
        }
        runs
    }

    /// The cell highlighted as the shared selected time, if it falls in
    /// this grid window
    pub fn selected_time_coord(&self, selected_time: DateTime<Utc>) -> Option<GridCoord> {
        self.geometry.coord_of(selected_time)
    }
}
