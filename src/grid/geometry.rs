// Grid geometry
// Maps grid coordinates to absolute instants and pixel points to cells

use chrono::{DateTime, Days, Duration, Utc};
use chrono_tz::Tz;

use super::GridCoord;
use crate::models::slot::SLOT_MINUTES;
use crate::utils::time::start_of_day_in;

/// Days materialized by the grid window
pub const GRID_DAYS: usize = 7;
/// 30-minute columns per day
pub const SLOTS_PER_DAY: usize = 48;

/// The materialized 7-day grid window starting "today" in the viewer's
/// timezone. Each day column is anchored at its own local midnight, so the
/// columns stay aligned with the calendar even across a DST transition;
/// row/column coordinates convert to absolute (UTC) slot instants through
/// the per-day anchors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    /// Local midnight of days 0..7; the extra entry closes day 6's interval
    day_starts: [DateTime<Utc>; GRID_DAYS + 1],
}

impl GridGeometry {
    /// Build the window for the viewer's zone at the given wall-clock moment
    pub fn new(zone: Tz, now: DateTime<Utc>) -> Self {
        let first_day = now.with_timezone(&zone).date_naive();
        let mut day_starts = [DateTime::<Utc>::MIN_UTC; GRID_DAYS + 1];
        for (offset, start) in day_starts.iter_mut().enumerate() {
            let date = first_day + Days::new(offset as u64);
            *start = start_of_day_in(zone, date);
        }
        Self { day_starts }
    }

    /// Anchor: absolute instant of local midnight on day 0
    pub fn window_start(&self) -> DateTime<Utc> {
        self.day_starts[0]
    }

    /// The absolute instant a grid cell represents. `day_index` must be
    /// below [`GRID_DAYS`].
    pub fn slot_instant(&self, coord: GridCoord) -> DateTime<Utc> {
        self.day_starts[coord.day_index]
            + Duration::minutes(coord.time_index as i64 * SLOT_MINUTES)
    }

    /// Start instants of the 7 day rows, for rendering headers
    pub fn day_starts(&self) -> Vec<DateTime<Utc>> {
        self.day_starts[..GRID_DAYS].to_vec()
    }

    /// The cell whose half-open slot interval covers the instant, if the
    /// instant falls inside the window. Used to mark the shared
    /// selected-time cursor. On a short (23-hour) DST day, slots past the
    /// local day boundary belong to the next day's column.
    pub fn coord_of(&self, instant: DateTime<Utc>) -> Option<GridCoord> {
        for day_index in 0..GRID_DAYS {
            if instant >= self.day_starts[day_index] && instant < self.day_starts[day_index + 1] {
                let minutes = (instant - self.day_starts[day_index]).num_minutes();
                let time_index = (minutes / SLOT_MINUTES) as usize;
                // The last hour of a long (25-hour) DST day has no row
                if time_index >= SLOTS_PER_DAY {
                    return None;
                }
                return Some(GridCoord::new(day_index, time_index));
            }
        }
        None
    }
}

/// Pixel dimensions of the rendered grid. Touch-move events report a point,
/// not a cell, so touch input has to be hit-tested back onto the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    /// Pixel offset of the first cell's top-left corner
    pub origin_x: f32,
    pub origin_y: f32,
    pub cell_width: f32,
    pub cell_height: f32,
}

impl CellMetrics {
    /// Resolve a touch point to the cell under it. Days run down rows,
    /// time slots across columns. Points outside the grid resolve to None.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<GridCoord> {
        if x < self.origin_x || y < self.origin_y {
            return None;
        }
        let time_index = ((x - self.origin_x) / self.cell_width) as usize;
        let day_index = ((y - self.origin_y) / self.cell_height) as usize;
        if time_index >= SLOTS_PER_DAY || day_index >= GRID_DAYS {
            return None;
        }
        Some(GridCoord::new(day_index, time_index))
    }
}
