//! Monthly day-state summaries for the date picker.
//!
//! Each UTC calendar day of a month is classified as `full` (a single slot
//! covers the whole day), `partial` (something blocks part of it) or `free`.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conflict::overlaps;
use crate::model::{saturating_add, AvailabilityResponse, BlockedWindow, Slot};

/// Availability of one UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayState {
    Free,
    Partial,
    Full,
}

impl fmt::Display for DayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DayState::Free => "free",
            DayState::Partial => "partial",
            DayState::Full => "full",
        };
        f.write_str(s)
    }
}

/// Day states keyed by date, in calendar order. Dates serialize as `YYYY-MM-DD`.
pub type MonthSummary = BTreeMap<NaiveDate, DayState>;

/// Classify every day of the month containing `month_ref`.
///
/// Only the year and month of `month_ref` are used. For each day with bounds
/// `[00:00:00.000, 23:59:59.999]` UTC:
///
/// 1. `Full` if any slot starts at or before the first instant and ends at or
///    after the last one. Full coverage wins regardless of anything else.
/// 2. `Partial` if any slot or booking window overlaps the day.
/// 3. `Free` otherwise.
pub fn summarize_month(data: &AvailabilityResponse, month_ref: NaiveDate) -> MonthSummary {
    let windows = data.blocked_windows();

    let summary: MonthSummary = month_days(month_ref)
        .map(|day| (day, classify_day(&data.slots, &windows, day)))
        .collect();

    debug!(
        month = %month_ref.format("%Y-%m"),
        days = summary.len(),
        full = summary.values().filter(|s| **s == DayState::Full).count(),
        partial = summary.values().filter(|s| **s == DayState::Partial).count(),
        "summarized month"
    );
    summary
}

/// All days of the month containing `month_ref`, first to last.
pub fn month_days(month_ref: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let first = month_ref - Duration::days(i64::from(month_ref.day0()));
    let month = first.month();
    first.iter_days().take_while(move |d| d.month() == month)
}

/// First and last millisecond of `day` in UTC.
pub fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(NaiveTime::MIN).and_utc();
    let end = saturating_add(start, Duration::days(1)) - Duration::milliseconds(1);
    (start, end)
}

fn classify_day(slots: &[Slot], windows: &[BlockedWindow], day: NaiveDate) -> DayState {
    let (day_start, day_end) = day_bounds(day);

    let has_full = slots
        .iter()
        .any(|s| s.start_dt <= day_start && s.end_dt >= day_end);
    if has_full {
        return DayState::Full;
    }

    let has_any = windows
        .iter()
        .any(|w| overlaps(w.start, w.end, day_start, day_end));
    if has_any {
        DayState::Partial
    } else {
        DayState::Free
    }
}
