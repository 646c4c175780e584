//! Tests for monthly day-state summaries.

use chrono::{Duration, NaiveDate};
use slot_engine::calendar::{summarize_month, DayState};
use slot_engine::model::{AvailabilityResponse, BookingRef, Slot};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn slot(id: i64, start: &str, end: &str) -> Slot {
    Slot {
        id,
        start_dt: start.parse().unwrap(),
        end_dt: end.parse().unwrap(),
        reason: None,
    }
}

fn booking(id: &str, pickup: &str) -> BookingRef {
    BookingRef {
        id: id.to_string(),
        pickup_when: pickup.parse().unwrap(),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── Worked examples ─────────────────────────────────────────────────────────

#[test]
fn short_slot_and_booking_make_the_day_partial() {
    let data = AvailabilityResponse::new(
        vec![slot(1, "2025-01-01T05:00:00Z", "2025-01-01T06:00:00Z")],
        vec![booking("b1", "2025-01-01T10:00:00Z")],
    );

    let summary = summarize_month(&data, date(2025, 1, 1));

    assert_eq!(summary[&date(2025, 1, 1)], DayState::Partial);
    assert_eq!(summary[&date(2025, 1, 2)], DayState::Free);
}

#[test]
fn midnight_to_midnight_slot_fills_one_day_only() {
    let data = AvailabilityResponse::new(
        vec![slot(2, "2025-01-02T00:00:00Z", "2025-01-03T00:00:00Z")],
        vec![],
    );

    let summary = summarize_month(&data, date(2025, 1, 1));

    assert_eq!(summary[&date(2025, 1, 1)], DayState::Free);
    assert_eq!(summary[&date(2025, 1, 2)], DayState::Full);
    // The slot ends exactly at the start of the 3rd: touching is not overlap.
    assert_eq!(summary[&date(2025, 1, 3)], DayState::Free);
}

// ── Coverage ────────────────────────────────────────────────────────────────

#[test]
fn one_entry_per_day_for_every_month_length() {
    let empty = AvailabilityResponse::default();
    for (month_ref, expected) in [
        (date(2025, 1, 15), 31),
        (date(2025, 2, 15), 28),
        (date(2024, 2, 15), 29),
        (date(2025, 4, 15), 30),
        (date(2025, 12, 31), 31),
    ] {
        let summary = summarize_month(&empty, month_ref);
        assert_eq!(summary.len(), expected, "month of {month_ref}");

        let days: Vec<NaiveDate> = summary.keys().copied().collect();
        for pair in days.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(1), "gap after {}", pair[0]);
        }
        assert!(summary.values().all(|s| *s == DayState::Free));
    }
}

#[test]
fn only_year_and_month_of_the_reference_are_used() {
    let data = AvailabilityResponse::new(
        vec![slot(1, "2025-03-10T08:00:00Z", "2025-03-10T09:00:00Z")],
        vec![],
    );
    assert_eq!(
        summarize_month(&data, date(2025, 3, 1)),
        summarize_month(&data, date(2025, 3, 31))
    );
}

// ── Full-day dominance ──────────────────────────────────────────────────────

#[test]
fn full_day_slot_wins_over_bookings_on_the_same_day() {
    let data = AvailabilityResponse::new(
        vec![
            slot(1, "2025-01-05T00:00:00Z", "2025-01-06T00:00:00Z"),
            slot(2, "2025-01-05T09:00:00Z", "2025-01-05T10:00:00Z"),
        ],
        vec![booking("b1", "2025-01-05T12:00:00Z")],
    );

    let summary = summarize_month(&data, date(2025, 1, 1));

    assert_eq!(summary[&date(2025, 1, 5)], DayState::Full);
}

#[test]
fn multi_day_slot_fills_inner_days_and_touches_edges() {
    let data = AvailabilityResponse::new(
        vec![slot(1, "2025-01-10T18:00:00Z", "2025-01-13T06:00:00Z")],
        vec![],
    );

    let summary = summarize_month(&data, date(2025, 1, 1));

    assert_eq!(summary[&date(2025, 1, 9)], DayState::Free);
    assert_eq!(summary[&date(2025, 1, 10)], DayState::Partial);
    assert_eq!(summary[&date(2025, 1, 11)], DayState::Full);
    assert_eq!(summary[&date(2025, 1, 12)], DayState::Full);
    assert_eq!(summary[&date(2025, 1, 13)], DayState::Partial);
    assert_eq!(summary[&date(2025, 1, 14)], DayState::Free);
}

#[test]
fn back_to_back_bookings_never_make_a_day_full() {
    let bookings = (0..24)
        .map(|h| booking(&format!("b{h}"), &format!("2025-01-07T{h:02}:00:00Z")))
        .collect();
    let data = AvailabilityResponse::new(vec![], bookings);

    let summary = summarize_month(&data, date(2025, 1, 1));

    assert_eq!(summary[&date(2025, 1, 7)], DayState::Partial);
}

// ── Boundaries ──────────────────────────────────────────────────────────────

#[test]
fn late_booking_spills_into_next_day() {
    let data = AvailabilityResponse::new(vec![], vec![booking("b1", "2025-01-01T23:30:00Z")]);

    let summary = summarize_month(&data, date(2025, 1, 1));

    assert_eq!(summary[&date(2025, 1, 1)], DayState::Partial);
    assert_eq!(summary[&date(2025, 1, 2)], DayState::Partial);
    assert_eq!(summary[&date(2025, 1, 3)], DayState::Free);
}

#[test]
fn booking_in_previous_month_spills_into_first_day() {
    let data = AvailabilityResponse::new(vec![], vec![booking("b1", "2024-12-31T23:30:00Z")]);

    let summary = summarize_month(&data, date(2025, 1, 1));

    assert_eq!(summary[&date(2025, 1, 1)], DayState::Partial);
    assert!(!summary.contains_key(&date(2024, 12, 31)));
}

#[test]
fn offset_timestamps_are_classified_by_utc_day() {
    // 01:00 at +03:00 is 22:00 UTC on the previous day.
    let data = AvailabilityResponse::new(
        vec![slot(1, "2025-01-02T01:00:00+03:00", "2025-01-02T02:00:00+03:00")],
        vec![],
    );

    let summary = summarize_month(&data, date(2025, 1, 1));

    assert_eq!(summary[&date(2025, 1, 1)], DayState::Partial);
    assert_eq!(summary[&date(2025, 1, 2)], DayState::Free);
}

#[test]
fn reversed_slot_is_evaluated_by_the_plain_inequality() {
    // 12:00 < day_end and day_start < 08:00, so the day reads partial; the
    // neighbouring days are untouched.
    let data = AvailabilityResponse::new(
        vec![slot(1, "2025-01-04T12:00:00Z", "2025-01-04T08:00:00Z")],
        vec![],
    );

    let summary = summarize_month(&data, date(2025, 1, 1));

    assert_eq!(summary[&date(2025, 1, 3)], DayState::Free);
    assert_eq!(summary[&date(2025, 1, 4)], DayState::Partial);
    assert_eq!(summary[&date(2025, 1, 5)], DayState::Free);
}

// ── Serialization ───────────────────────────────────────────────────────────

#[test]
fn last_representable_month_summarizes_without_overflow() {
    let data = AvailabilityResponse::new(
        vec![],
        vec![BookingRef {
            id: "late".to_string(),
            pickup_when: NaiveDate::MAX.and_hms_opt(23, 30, 0).unwrap().and_utc(),
        }],
    );

    let summary = summarize_month(&data, NaiveDate::MAX);

    assert_eq!(summary.len(), 31);
    assert_eq!(summary[&NaiveDate::MAX], DayState::Partial);
    assert_eq!(summary.values().filter(|s| **s == DayState::Free).count(), 30);
}

#[test]
fn summary_serializes_as_date_keyed_object() {
    let data = AvailabilityResponse::new(
        vec![slot(2, "2025-02-02T00:00:00Z", "2025-02-03T00:00:00Z")],
        vec![booking("b1", "2025-02-05T10:00:00Z")],
    );

    let summary = summarize_month(&data, date(2025, 2, 1));
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json.as_object().unwrap().len(), 28);
    assert_eq!(json["2025-02-01"], "free");
    assert_eq!(json["2025-02-02"], "full");
    assert_eq!(json["2025-02-05"], "partial");
}
