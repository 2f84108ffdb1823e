// Heatmap aggregator
// Per-slot overlap counts over the other participants' availability

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::meeting::Participant;
use crate::models::slot::expand_range;

/// Count, per slot, how many participants other than the viewer are
/// available. The viewer is excluded so their own in-progress edits never
/// feed back into the stored counts; their contribution is added at display
/// time only. Misaligned ranges are floored to slot boundaries by expansion.
pub fn overlap_counts(
    viewer_id: &str,
    participants: &[Participant],
) -> HashMap<DateTime<Utc>, u32> {
    let mut counts = HashMap::new();
    for participant in participants.iter().filter(|p| p.id != viewer_id) {
        for range in &participant.availability {
            for slot in expand_range(range) {
                *counts.entry(slot).or_insert(0) += 1;
            }
        }
    }
    counts
}

/// The number shown in a cell: other participants plus the viewer when
/// their effective selection covers the slot
pub fn displayed_count(
    counts: &HashMap<DateTime<Utc>, u32>,
    slot: DateTime<Utc>,
    viewer_effective_selected: bool,
) -> u32 {
    let others = counts.get(&slot).copied().unwrap_or(0);
    others + u32::from(viewer_effective_selected)
}
