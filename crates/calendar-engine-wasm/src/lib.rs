//! WASM bindings for calendar-engine.
//!
//! Exposes recurrence expansion, conflict detection, search filtering and the
//! month grid to the browser front end via `wasm-bindgen`. Events cross the
//! boundary as the same camelCase JSON the front end keeps in local storage,
//! so no DTO layer is needed for them.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p calendar-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/src/wasm/ \
//!   target/wasm32-unknown-unknown/release/calendar_engine_wasm.wasm
//! ```

use calendar_engine::{
    detect_conflicts_excluding, expand_all, format_event_time, month_grid, parse_date, Event,
    EventFilter,
};
use chrono::NaiveDate;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// JSON helpers, kept free of `JsValue` so they run in native tests
// ---------------------------------------------------------------------------

fn parse_view_date(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

fn parse_events(json: &str) -> Result<Vec<Event>, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid events JSON: {}", e))
}

fn parse_event(json: &str) -> Result<Event, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid event JSON: {}", e))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn expand_events_json(events_json: &str, view_date: &str) -> Result<String, String> {
    let events = parse_events(events_json)?;
    let view = parse_view_date(view_date)?;
    to_json(&expand_all(&events, view))
}

fn detect_conflicts_json(
    candidate_json: &str,
    existing_json: &str,
    exclude_self: bool,
) -> Result<String, String> {
    let candidate = parse_event(candidate_json)?;
    let existing = parse_events(existing_json)?;
    let conflicts = if exclude_self {
        detect_conflicts_excluding(&candidate, &existing)
    } else {
        calendar_engine::detect_conflicts(&candidate, &existing)
    };
    to_json(&conflicts)
}

fn filter_events_json(
    events_json: &str,
    search: &str,
    categories_json: &str,
) -> Result<String, String> {
    let events = parse_events(events_json)?;
    let categories: Vec<String> = serde_json::from_str(categories_json)
        .map_err(|e| format!("Invalid categories JSON: {}", e))?;
    let filter = EventFilter::new()
        .with_search(search)
        .with_categories(categories);
    to_json(&filter.apply(&events))
}

fn month_grid_json(view_date: &str) -> Result<String, String> {
    let view = parse_view_date(view_date)?;
    to_json(&month_grid(view))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Expand every stored event for the month containing `viewDate`.
///
/// `eventsJson` is a JSON array of stored events; `viewDate` is `YYYY-MM-DD`
/// or an ISO datetime. Returns a JSON array of events: one-off events as-is,
/// recurring series as their occurrences inside the three-month window.
#[wasm_bindgen(js_name = "expandEvents")]
pub fn expand_events(events_json: &str, view_date: &str) -> Result<String, JsValue> {
    expand_events_json(events_json, view_date).map_err(|e| JsValue::from_str(&e))
}

/// Check a candidate event against existing (already expanded) events.
///
/// With `excludeSelf`, entries sharing the candidate's id are skipped, which
/// is what the edit and drag-to-move paths need. Returns a JSON array of
/// `{event1, event2, type}` objects, `type` being `overlap` or `same_time`.
#[wasm_bindgen(js_name = "detectConflicts")]
pub fn detect_conflicts(
    candidate_json: &str,
    existing_json: &str,
    exclude_self: bool,
) -> Result<String, JsValue> {
    detect_conflicts_json(candidate_json, existing_json, exclude_self)
        .map_err(|e| JsValue::from_str(&e))
}

/// Apply the sidebar search term and category selection.
///
/// `categoriesJson` is a JSON array of category ids; an empty array selects
/// every category.
#[wasm_bindgen(js_name = "filterEvents")]
pub fn filter_events(
    events_json: &str,
    search: &str,
    categories_json: &str,
) -> Result<String, JsValue> {
    filter_events_json(events_json, search, categories_json).map_err(|e| JsValue::from_str(&e))
}

/// The 42 `{date, inMonth}` cells of the month containing `viewDate`.
#[wasm_bindgen(js_name = "monthGrid")]
pub fn month_grid_cells(view_date: &str) -> Result<String, JsValue> {
    month_grid_json(view_date).map_err(|e| JsValue::from_str(&e))
}

/// The time label for an event card (`"All day"`, `"9:00 AM - 10:00 AM"`, ...).
#[wasm_bindgen(js_name = "formatEventTime")]
pub fn format_event_time_label(event_json: &str) -> Result<String, JsValue> {
    parse_event(event_json)
        .map(|event| format_event_time(&event))
        .map_err(|e| JsValue::from_str(&e))
}
