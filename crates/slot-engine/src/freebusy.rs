//! Free windows between blocked windows.
//!
//! Sorts blocked windows by start, merges overlapping or touching ones, then
//! returns the gaps inside a query window. Used to suggest the next open time
//! when a requested pickup collides.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{AvailabilityResponse, BlockedWindow};

/// A gap with no slot or booking in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

/// Merge blocked windows clipped to `[window_start, window_end)`.
///
/// Degenerate windows (`end <= start`) block nothing and are skipped.
/// Returns a sorted, non-overlapping list of (start, end) intervals.
pub(crate) fn merge_blocked(
    windows: &[BlockedWindow],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    // Clip to the query window, dropping degenerate windows and those entirely outside.
    let mut intervals: Vec<(DateTime<Utc>, DateTime<Utc>)> = windows
        .iter()
        .filter(|w| w.start < w.end)
        .filter(|w| w.start < window_end && w.end > window_start)
        .map(|w| (w.start.max(window_start), w.end.min(window_end)))
        .collect();

    if intervals.is_empty() {
        return Vec::new();
    }

    // Sort by start time (then by end time for stability).
    intervals.sort_by_key(|&(start, end)| (start, end));

    // Merge overlapping or touching intervals.
    let mut merged: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::new();
    for (start, end) in intervals {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                // Overlapping or adjacent: extend the current interval.
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

/// Find the free windows of `data` inside `[window_start, window_end)`.
///
/// Returns windows sorted by start. An inverted query window yields nothing.
pub fn find_free_windows(
    data: &AvailabilityResponse,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<FreeWindow> {
    if window_start >= window_end {
        return Vec::new();
    }

    let merged = merge_blocked(&data.blocked_windows(), window_start, window_end);

    let mut free = Vec::new();
    let mut cursor = window_start;

    for (busy_start, busy_end) in &merged {
        if cursor < *busy_start {
            free.push(FreeWindow {
                start: cursor,
                end: *busy_start,
                duration_minutes: (*busy_start - cursor).num_minutes(),
            });
        }
        cursor = cursor.max(*busy_end);
    }

    // Trailing gap after the last busy period.
    if cursor < window_end {
        free.push(FreeWindow {
            start: cursor,
            end: window_end,
            duration_minutes: (window_end - cursor).num_minutes(),
        });
    }

    free
}

/// First free window of at least `min_duration_minutes` inside the query window.
pub fn first_free_window(
    data: &AvailabilityResponse,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    min_duration_minutes: i64,
) -> Option<FreeWindow> {
    find_free_windows(data, window_start, window_end)
        .into_iter()
        .find(|w| w.duration_minutes >= min_duration_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WindowSource;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, h, 0, 0).unwrap()
    }

    fn window(start: u32, end: u32) -> BlockedWindow {
        BlockedWindow {
            start: at(start),
            end: at(end),
            source: WindowSource::Slot { id: 0 },
        }
    }

    #[test]
    fn touching_windows_merge_into_one() {
        let merged = merge_blocked(&[window(9, 10), window(10, 11)], at(0), at(23));
        assert_eq!(merged, vec![(at(9), at(11))]);
    }

    #[test]
    fn reversed_windows_are_skipped() {
        let merged = merge_blocked(&[window(12, 8), window(14, 15)], at(0), at(23));
        assert_eq!(merged, vec![(at(14), at(15))]);
    }

    #[test]
    fn windows_are_clipped_to_the_query() {
        let merged = merge_blocked(&[window(6, 10)], at(8), at(12));
        assert_eq!(merged, vec![(at(8), at(10))]);
    }
}
