//! WASM bindings for slot-engine.
//!
//! Exposes the month summary, hourly buckets, pickup checks and free windows to
//! the booking front end via `wasm-bindgen`. All complex types cross the
//! boundary as JSON strings; availability documents use the endpoint's wire
//! shape and are parsed leniently.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/src/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::NaiveDate;
use slot_engine::{AvailabilityResponse, MonthKey, SlotError};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// JSON-in / JSON-out implementations, callable from native tests
// ---------------------------------------------------------------------------

/// Resolve the month argument of `summarizeMonth`.
///
/// Accepts "2025-01", "2025-01-17", or a full instant such as the output of
/// `Date.prototype.toISOString()` (its UTC date decides the month).
fn parse_month_ref(s: &str) -> Result<NaiveDate, SlotError> {
    if let Ok(key) = s.parse::<MonthKey>() {
        return Ok(key.first_day());
    }
    if let Ok(day) = slot_engine::parse_day(s) {
        return Ok(day);
    }
    slot_engine::parse_instant(s)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| SlotError::InvalidMonth(s.to_string()))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn summarize_month_json(data_json: &str, month: &str) -> Result<String, String> {
    let data = AvailabilityResponse::from_json(data_json).map_err(|e| e.to_string())?;
    let month_ref = parse_month_ref(month).map_err(|e| e.to_string())?;
    to_json(&slot_engine::summarize_month(&data, month_ref))
}

fn calculate_hours_json(data_json: Option<&str>, date: &str) -> Result<String, String> {
    let data = data_json
        .map(AvailabilityResponse::from_json)
        .transpose()
        .map_err(|e| e.to_string())?;
    let day = slot_engine::parse_day(date).map_err(|e| e.to_string())?;
    to_json(&slot_engine::calculate_hours(data.as_ref(), day))
}

fn check_pickup_json(data_json: &str, pickup_when: &str) -> Result<String, String> {
    let data = AvailabilityResponse::from_json(data_json).map_err(|e| e.to_string())?;
    let pickup = slot_engine::parse_instant(pickup_when)
        .ok_or_else(|| format!("Invalid datetime '{}'", pickup_when))?;
    to_json(&slot_engine::check_pickup(&data, pickup))
}

fn find_free_windows_json(
    data_json: &str,
    window_start: &str,
    window_end: &str,
) -> Result<String, String> {
    let data = AvailabilityResponse::from_json(data_json).map_err(|e| e.to_string())?;
    let ws = slot_engine::parse_instant(window_start)
        .ok_or_else(|| format!("Invalid datetime '{}'", window_start))?;
    let we = slot_engine::parse_instant(window_end)
        .ok_or_else(|| format!("Invalid datetime '{}'", window_end))?;
    to_json(&slot_engine::find_free_windows(&data, ws, we))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Classify every day of a month as "free", "partial" or "full".
///
/// `data_json` is the availability document. `month` is "YYYY-MM", a
/// "YYYY-MM-DD" inside the month, or an ISO instant. Returns a JSON object
/// keyed by "YYYY-MM-DD".
#[wasm_bindgen(js_name = "summarizeMonth")]
pub fn summarize_month(data_json: &str, month: &str) -> Result<String, JsValue> {
    summarize_month_json(data_json, month).map_err(|e| JsValue::from_str(&e))
}

/// Compute the 24 UTC hour buckets of `date` ("YYYY-MM-DD").
///
/// Pass `null` for `data_json` when availability has not loaded yet; every
/// bucket is then enabled. Returns a JSON array of `{label, iso, disabled}`.
#[wasm_bindgen(js_name = "calculateHours")]
pub fn calculate_hours(data_json: Option<String>, date: &str) -> Result<String, JsValue> {
    calculate_hours_json(data_json.as_deref(), date).map_err(|e| JsValue::from_str(&e))
}

/// Check whether a 60-minute booking may start at `pickup_when`.
///
/// Returns a JSON object `{pickup_when, ends_at, available, conflicts}`.
#[wasm_bindgen(js_name = "checkPickup")]
pub fn check_pickup(data_json: &str, pickup_when: &str) -> Result<String, JsValue> {
    check_pickup_json(data_json, pickup_when).map_err(|e| JsValue::from_str(&e))
}

/// Find free windows between `window_start` and `window_end`.
///
/// Returns a JSON array of `{start, end, duration_minutes}` objects.
#[wasm_bindgen(js_name = "findFreeWindows")]
pub fn find_free_windows(
    data_json: &str,
    window_start: &str,
    window_end: &str,
) -> Result<String, JsValue> {
    find_free_windows_json(data_json, window_start, window_end).map_err(|e| JsValue::from_str(&e))
}
