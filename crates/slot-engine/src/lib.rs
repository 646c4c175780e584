//! # slot-engine
//!
//! UTC-anchored availability for ride bookings.
//!
//! A driver's calendar is a sparse set of blocked intervals: unavailability
//! slots the driver declared, plus confirmed bookings that each occupy a fixed
//! 60-minute window. This crate turns that set into the two views a booking
//! front end needs, a per-day `free | partial | full` summary for a month and
//! 24 enabled/disabled hour buckets for a single day, and answers whether a
//! proposed pickup time collides with anything.
//!
//! Every computation is a pure function of its arguments. Hours and days are
//! anchored to UTC, so the same data renders identically for every viewer.
//!
//! ## Modules
//!
//! - [`model`] — `Slot`, `BookingRef`, `AvailabilityResponse` and blocked windows
//! - [`conflict`] — half-open overlap primitive, conflict and pickup checks
//! - [`calendar`] — monthly day-state summaries
//! - [`hourly`] — hourly buckets for one day
//! - [`freebusy`] — free windows between merged blocked windows
//! - [`wire`] — JSON boundary parsing, day and month keys
//! - [`error`] — Error types

pub mod calendar;
pub mod conflict;
pub mod error;
pub mod freebusy;
pub mod hourly;
pub mod model;
pub mod wire;

pub use calendar::{summarize_month, DayState, MonthSummary};
pub use conflict::{check_pickup, find_conflicts, overlaps, Conflict, PickupCheck};
pub use error::SlotError;
pub use freebusy::{find_free_windows, first_free_window, FreeWindow};
pub use hourly::{calculate_hours, first_enabled_hour, HourlyAvailabilitySlot};
pub use model::{
    AvailabilityResponse, BlockedWindow, BookingRef, Slot, WindowSource, BOOKING_DURATION_MINUTES,
};
pub use wire::{parse_availability, parse_day, parse_instant, MonthKey, ParseMode};
