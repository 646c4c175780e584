//! Availability data model.
//!
//! Mirrors the JSON returned by the availability endpoint, already narrowed to
//! UTC instants. See [`crate::wire`] for turning raw JSON into these types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Length of the window a confirmed booking occupies, starting at pickup.
pub const BOOKING_DURATION_MINUTES: i64 = 60;

/// `start + delta`, pinned to the last representable instant on overflow.
///
/// Instants near the end of chrono's range still parse, so window ends are
/// computed with this instead of `+`.
pub(crate) fn saturating_add(start: DateTime<Utc>, delta: Duration) -> DateTime<Utc> {
    start
        .checked_add_signed(delta)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// A driver-declared window of unavailability.
///
/// `start_dt < end_dt` is expected but not enforced; a reversed slot is fed to
/// [`crate::conflict::overlaps`] unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: i64,
    pub start_dt: DateTime<Utc>,
    pub end_dt: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A confirmed booking. It blocks `[pickup_when, pickup_when + 60min)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRef {
    pub id: String,
    pub pickup_when: DateTime<Utc>,
}

impl BookingRef {
    /// End of the occupied window (exclusive).
    pub fn ends_at(&self) -> DateTime<Utc> {
        saturating_add(self.pickup_when, Duration::minutes(BOOKING_DURATION_MINUTES))
    }
}

/// Slots and bookings for a period, as fetched from the backend.
///
/// Both collections are unordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    #[serde(default)]
    pub slots: Vec<Slot>,
    #[serde(default)]
    pub bookings: Vec<BookingRef>,
}

/// What produced a [`BlockedWindow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WindowSource {
    Slot { id: i64 },
    Booking { id: String },
}

/// A half-open `[start, end)` interval during which no pickup may be placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub source: WindowSource,
}

impl From<&Slot> for BlockedWindow {
    fn from(slot: &Slot) -> Self {
        Self {
            start: slot.start_dt,
            end: slot.end_dt,
            source: WindowSource::Slot { id: slot.id },
        }
    }
}

impl From<&BookingRef> for BlockedWindow {
    fn from(booking: &BookingRef) -> Self {
        Self {
            start: booking.pickup_when,
            end: booking.ends_at(),
            source: WindowSource::Booking {
                id: booking.id.clone(),
            },
        }
    }
}

impl AvailabilityResponse {
    pub fn new(slots: Vec<Slot>, bookings: Vec<BookingRef>) -> Self {
        Self { slots, bookings }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && self.bookings.is_empty()
    }

    /// Project every slot and booking to its blocked window, slots first.
    pub fn blocked_windows(&self) -> Vec<BlockedWindow> {
        self.slots
            .iter()
            .map(BlockedWindow::from)
            .chain(self.bookings.iter().map(BlockedWindow::from))
            .collect()
    }
}
