// Reconciliation controller
// Owns the viewer's working selection and keeps it converged with the
// authoritative (server-confirmed) availability: debounced saves, no
// overwrites of unsaved local edits, dirty flag cleared only on set
// equality between the two.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::models::meeting::AvailabilityRange;
use crate::models::slot::{compact_slots, expand_ranges, sets_equal};

use super::drag::DragMode;

/// Inactivity delay before an edited selection is saved
pub const DEBOUNCE: Duration = Duration::from_secs(1);
/// How long the "Saved" indicator is held before returning to Idle
pub const SAVED_HOLD: Duration = Duration::from_secs(2);

/// Observational save indicator. Does not gate correctness; convergence is
/// decided by set equality with the authoritative state, never by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
    Failed,
}

/// Snapshot handed to the persistence collaborator when the debounce fires.
/// `ranges` is the compacted form for storage; `slots` the same set as wire
/// keys for the realtime broadcast after the store acknowledges.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub ranges: Vec<AvailabilityRange>,
    pub slots: Vec<DateTime<Utc>>,
}

/// Per-editing-session reconciliation state. Single-writer: only the
/// viewer's own gestures mutate the working selection; authoritative
/// updates flow in through [`ReconcileController::apply_authoritative`].
#[derive(Debug, Clone)]
pub struct ReconcileController {
    working: BTreeSet<DateTime<Utc>>,
    has_unsaved_changes: bool,
    save_status: SaveStatus,
    debounce_deadline: Option<Instant>,
    saved_hold_deadline: Option<Instant>,
    drag_in_progress: bool,
}

impl ReconcileController {
    pub fn new(initial: &[AvailabilityRange]) -> Self {
        Self {
            working: expand_ranges(initial),
            has_unsaved_changes: false,
            save_status: SaveStatus::Idle,
            debounce_deadline: None,
            saved_hold_deadline: None,
            drag_in_progress: false,
        }
    }

    pub fn working_selection(&self) -> &BTreeSet<DateTime<Utc>> {
        &self.working
    }

    pub fn is_selected(&self, slot: DateTime<Utc>) -> bool {
        self.working.contains(&slot)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    pub fn save_status(&self) -> SaveStatus {
        self.save_status
    }

    /// A drag gesture started; suppress the debounce until it ends so no
    /// save fires mid-gesture
    pub fn begin_drag(&mut self) {
        self.drag_in_progress = true;
        self.debounce_deadline = None;
    }

    /// The drag gesture ended (committed or aborted); re-arm the debounce
    /// if edits are pending
    pub fn end_drag(&mut self, now: Instant) {
        self.drag_in_progress = false;
        if self.has_unsaved_changes {
            self.debounce_deadline = Some(now + DEBOUNCE);
        }
    }

    /// Flip a single slot's membership (plain click in edit mode)
    pub fn toggle_slot(&mut self, slot: DateTime<Utc>, now: Instant) {
        if !self.working.remove(&slot) {
            self.working.insert(slot);
        }
        self.note_edit(now);
    }

    /// Apply a committed drag rectangle across the given slots
    pub fn apply_span<I>(&mut self, slots: I, mode: DragMode, now: Instant)
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        for slot in slots {
            match mode {
                DragMode::Add => {
                    self.working.insert(slot);
                }
                DragMode::Remove => {
                    self.working.remove(&slot);
                }
            }
        }
        self.note_edit(now);
    }

    fn note_edit(&mut self, now: Instant) {
        self.has_unsaved_changes = true;
        // Reset the indicator, but an in-flight save stays in-flight
        if self.save_status != SaveStatus::Saving {
            self.save_status = SaveStatus::Idle;
        }
        self.saved_hold_deadline = None;
        if !self.drag_in_progress {
            self.debounce_deadline = Some(now + DEBOUNCE);
        }
    }

    /// Fold in the server-confirmed availability.
    ///
    /// While edits are unsaved the working selection is the single source
    /// of truth and is never overwritten; a stale echo cannot regress an
    /// in-progress edit. Once the authoritative set is set-equal to the
    /// working selection the dirty flag clears, which is the only path
    /// that clears it.
    pub fn apply_authoritative(&mut self, ranges: &[AvailabilityRange]) {
        let authoritative = expand_ranges(ranges);

        if !self.has_unsaved_changes && !sets_equal(&authoritative, &self.working) {
            self.working = authoritative;
            return;
        }

        if sets_equal(&authoritative, &self.working) {
            self.has_unsaved_changes = false;
            self.debounce_deadline = None;
        }
    }

    /// Advance the controller's clock. Fires the debounced save when due:
    /// dirty, no drag in progress, no save already in flight, deadline
    /// passed. The returned request snapshots the current working selection
    /// (never a stale one), so a save racing a newer edit still persists
    /// the newest state. Also expires the "Saved" indicator back to Idle.
    pub fn poll(&mut self, now: Instant) -> Option<SaveRequest> {
        if let Some(hold) = self.saved_hold_deadline {
            if now >= hold {
                self.saved_hold_deadline = None;
                if self.save_status == SaveStatus::Saved {
                    self.save_status = SaveStatus::Idle;
                }
            }
        }

        let deadline = self.debounce_deadline?;
        if now < deadline
            || !self.has_unsaved_changes
            || self.drag_in_progress
            || self.save_status == SaveStatus::Saving
        {
            return None;
        }

        self.debounce_deadline = None;
        self.save_status = SaveStatus::Saving;

        let slots: Vec<DateTime<Utc>> = self.working.iter().copied().collect();
        Some(SaveRequest {
            ranges: compact_slots(slots.iter().copied()),
            slots,
        })
    }

    /// The persistence collaborator acknowledged the save. Status moves to
    /// Saved (held briefly); the dirty flag is deliberately left alone and
    /// clears only once the authoritative echo converges.
    pub fn save_succeeded(&mut self, now: Instant) {
        self.save_status = SaveStatus::Saved;
        self.saved_hold_deadline = Some(now + SAVED_HOLD);
    }

    /// The save failed. Working selection and dirty flag are untouched so
    /// no edit is lost; the next selection-changing interaction re-arms the
    /// debounce and retries naturally.
    pub fn save_failed(&mut self) {
        log::warn!("Availability save failed; keeping local edits");
        self.save_status = SaveStatus::Failed;
        self.saved_hold_deadline = None;
    }
}
