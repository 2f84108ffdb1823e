// Availability grid module
// Headless state for the drag-to-select availability editor: grid window
// geometry, the drag state machine, the overlap heatmap, and the
// save/reconciliation controller that keeps local edits and server state
// converged.

pub mod drag;
pub mod editor;
pub mod geometry;
pub mod heatmap;
pub mod reconcile;

/// A cell position in the grid: day row and 30-minute column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCoord {
    pub day_index: usize,
    pub time_index: usize,
}

impl GridCoord {
    pub fn new(day_index: usize, time_index: usize) -> Self {
        Self {
            day_index,
            time_index,
        }
    }
}
