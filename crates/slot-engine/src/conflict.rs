//! Half-open interval overlap and booking conflict detection.
//!
//! Adjacent intervals (one ends exactly when the other starts) are NOT
//! conflicts: a booking ending at 10:00 leaves the 10:00 hour open.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{saturating_add, AvailabilityResponse, BlockedWindow, BOOKING_DURATION_MINUTES};

/// True iff `[a_start, a_end)` and `[b_start, b_end)` intersect.
///
/// Reversed or zero-width intervals are evaluated by the same inequality with
/// no special casing; the result is deterministic if not always intuitive.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// A blocked window that collides with a proposed interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub window: BlockedWindow,
    pub overlap_minutes: i64,
}

/// Result of checking a proposed pickup time against the driver's calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupCheck {
    pub pickup_when: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub available: bool,
    pub conflicts: Vec<Conflict>,
}

/// Find every slot or booking whose window overlaps `[start, end)`.
///
/// The overlap duration is `min(ends) - max(starts)`, floored at zero.
/// Conflicts are reported in [`AvailabilityResponse::blocked_windows`] order.
pub fn find_conflicts(
    data: &AvailabilityResponse,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<Conflict> {
    let conflicts: Vec<Conflict> = data
        .blocked_windows()
        .into_iter()
        .filter(|w| overlaps(start, end, w.start, w.end))
        .map(|window| {
            let overlap_start = start.max(window.start);
            let overlap_end = end.min(window.end);
            let overlap_minutes = (overlap_end - overlap_start).num_minutes().max(0);
            Conflict {
                window,
                overlap_minutes,
            }
        })
        .collect();

    debug!(%start, %end, conflicts = conflicts.len(), "checked interval for conflicts");
    conflicts
}

/// Check whether a new booking may be placed at `pickup_when`.
///
/// The proposed booking occupies the same fixed-length window as a confirmed
/// one; it is available iff that window collides with nothing.
pub fn check_pickup(data: &AvailabilityResponse, pickup_when: DateTime<Utc>) -> PickupCheck {
    let ends_at = saturating_add(pickup_when, Duration::minutes(BOOKING_DURATION_MINUTES));
    let conflicts = find_conflicts(data, pickup_when, ends_at);
    PickupCheck {
        pickup_when,
        ends_at,
        available: conflicts.is_empty(),
        conflicts,
    }
}
