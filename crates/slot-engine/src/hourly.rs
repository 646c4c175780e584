//! Hourly buckets for a single UTC day.
//!
//! Always 24 buckets, `[h:00, h+1:00)` UTC for `h` in `0..24`. Labels are
//! formatted in UTC so a driver slot at 05:00Z shows as "05:00" everywhere.

use chrono::{Duration, NaiveDate, NaiveTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conflict::overlaps;
use crate::model::{saturating_add, AvailabilityResponse};

pub const HOURS_PER_DAY: i64 = 24;

/// One selectable hour in the booking timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyAvailabilitySlot {
    /// `HH:MM`, 24-hour clock, UTC.
    pub label: String,
    /// Bucket start, RFC 3339 with milliseconds and a `Z` suffix.
    pub iso: String,
    pub disabled: bool,
}

/// Compute the 24 hour buckets of `day`.
///
/// A bucket is disabled iff it overlaps any booking window or slot window.
/// With no data every bucket is enabled: missing data means available.
pub fn calculate_hours(
    data: Option<&AvailabilityResponse>,
    day: NaiveDate,
) -> Vec<HourlyAvailabilitySlot> {
    let windows = data
        .map(AvailabilityResponse::blocked_windows)
        .unwrap_or_default();
    let day_start = day.and_time(NaiveTime::MIN).and_utc();

    let hours: Vec<HourlyAvailabilitySlot> = (0..HOURS_PER_DAY)
        .map(|h| {
            let start = saturating_add(day_start, Duration::hours(h));
            let end = saturating_add(start, Duration::hours(1));
            let disabled = windows
                .iter()
                .any(|w| overlaps(start, end, w.start, w.end));
            HourlyAvailabilitySlot {
                label: start.format("%H:%M").to_string(),
                iso: start.to_rfc3339_opts(SecondsFormat::Millis, true),
                disabled,
            }
        })
        .collect();

    debug!(
        %day,
        has_data = data.is_some(),
        disabled = hours.iter().filter(|h| h.disabled).count(),
        "calculated hourly buckets"
    );
    hours
}

/// The earliest bucket a customer can still select, if any.
pub fn first_enabled_hour(hours: &[HourlyAvailabilitySlot]) -> Option<&HourlyAvailabilitySlot> {
    hours.iter().find(|h| !h.disabled)
}
