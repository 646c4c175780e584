//! JSON boundary for the availability endpoint.
//!
//! The backend returns
//!
//! ```json
//! {
//!   "slots":    [{ "id": 1, "start_dt": "2025-01-01T05:00:00Z", "end_dt": "2025-01-01T06:00:00Z", "reason": "service" }],
//!   "bookings": [{ "id": "b1", "pickup_when": "2025-01-01T10:00:00Z" }]
//! }
//! ```
//!
//! Timestamps arrive as strings in any offset. They are narrowed to UTC here so
//! the rest of the crate only ever sees typed instants.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SlotError};
use crate::model::{AvailabilityResponse, BookingRef, Slot};

/// How to treat timestamps that fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Drop the entry. An unparseable window blocks nothing, so the affected
    /// time reads as available.
    #[default]
    Lenient,
    /// Fail with [`SlotError::InvalidTimestamp`] or [`SlotError::InvalidId`].
    Strict,
}

#[derive(Deserialize)]
struct RawAvailability {
    #[serde(default)]
    slots: Vec<RawSlot>,
    #[serde(default)]
    bookings: Vec<RawBooking>,
}

#[derive(Deserialize)]
struct RawSlot {
    id: serde_json::Number,
    start_dt: String,
    end_dt: String,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Deserialize)]
struct RawBooking {
    id: String,
    pickup_when: String,
}

/// Parse an availability document.
///
/// # Errors
/// Returns `SlotError::Json` if the document is not valid JSON or does not
/// match the wire shape. In `Strict` mode, returns `SlotError::InvalidTimestamp`
/// for the first timestamp that does not parse and `SlotError::InvalidId` for a
/// slot id that is not an integer in `i64` range.
pub fn parse_availability(json: &str, mode: ParseMode) -> Result<AvailabilityResponse> {
    let raw: RawAvailability = serde_json::from_str(json)?;
    let mut data = AvailabilityResponse::default();

    for (i, slot) in raw.slots.into_iter().enumerate() {
        let id = slot_id(&slot.id, i, mode)?;
        let start = instant_field(&slot.start_dt, || format!("slots[{i}].start_dt"), mode)?;
        let end = instant_field(&slot.end_dt, || format!("slots[{i}].end_dt"), mode)?;
        match (start, end) {
            (Some(start_dt), Some(end_dt)) => data.slots.push(Slot {
                id,
                start_dt,
                end_dt,
                reason: slot.reason,
            }),
            _ => warn!(slot_id = id, "dropping slot with unparseable timestamp"),
        }
    }

    for (i, booking) in raw.bookings.into_iter().enumerate() {
        match instant_field(&booking.pickup_when, || format!("bookings[{i}].pickup_when"), mode)? {
            Some(pickup_when) => data.bookings.push(BookingRef {
                id: booking.id,
                pickup_when,
            }),
            None => warn!(booking_id = %booking.id, "dropping booking with unparseable timestamp"),
        }
    }

    Ok(data)
}

impl AvailabilityResponse {
    /// Parse an availability document leniently. See [`parse_availability`].
    pub fn from_json(json: &str) -> Result<Self> {
        parse_availability(json, ParseMode::Lenient)
    }
}

/// Narrow a slot id to `i64`.
///
/// Lenient mode truncates fractional ids and clamps out-of-range ones, so the
/// slot still blocks its window.
fn slot_id(raw: &serde_json::Number, index: usize, mode: ParseMode) -> Result<i64> {
    if let Some(id) = raw.as_i64() {
        return Ok(id);
    }
    match (raw.as_f64(), mode) {
        (Some(f), ParseMode::Lenient) => {
            let id = f as i64;
            warn!(raw_id = %raw, slot_id = id, "coercing non-integer slot id");
            Ok(id)
        }
        _ => Err(SlotError::InvalidId {
            field: format!("slots[{index}].id"),
            value: raw.to_string(),
        }),
    }
}

fn instant_field(
    value: &str,
    field: impl FnOnce() -> String,
    mode: ParseMode,
) -> Result<Option<DateTime<Utc>>> {
    match (parse_instant(value), mode) {
        (Some(dt), _) => Ok(Some(dt)),
        (None, ParseMode::Lenient) => Ok(None),
        (None, ParseMode::Strict) => Err(SlotError::InvalidTimestamp {
            field: field(),
            value: value.to_string(),
        }),
    }
}

/// Parse a timestamp into a UTC instant.
///
/// Accepts RFC 3339 with any offset (e.g., "2025-01-01T05:00:00+02:00") plus
/// the looser ISO 8601 forms the backend and browsers emit:
///
/// - minute precision, "2025-01-01T05:00Z" or "2025-01-01T05:00+02:00"
/// - basic or hour-only offsets, "2025-01-01T05:00:00+0200", "...+02"
/// - naive "2025-01-01T05:00[:00[.fff]]", read as UTC
/// - a bare date "2025-01-01", read as UTC midnight
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(naive) = s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
        return parse_naive(naive);
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    parse_naive(s).or_else(|| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
    })
}

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

fn parse_naive(s: &str) -> Option<DateTime<Utc>> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|ndt| ndt.and_utc())
}

/// Parse a `YYYY-MM-DD` day key.
pub fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| SlotError::InvalidDate(s.to_string()))
}

/// A calendar month, as used in `?month=YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    /// The month containing `day`.
    pub fn containing(day: NaiveDate) -> Self {
        Self(crate::calendar::month_days(day).next().unwrap_or(day))
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }
}

impl FromStr for MonthKey {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        // "2025-1" would otherwise parse; the endpoint only accepts two digits.
        if trimmed.len() != 7 {
            return Err(SlotError::InvalidMonth(s.to_string()));
        }
        NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| SlotError::InvalidMonth(s.to_string()))
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl TryFrom<String> for MonthKey {
    type Error = SlotError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

impl From<NaiveDate> for MonthKey {
    fn from(day: NaiveDate) -> Self {
        Self::containing(day)
    }
}
