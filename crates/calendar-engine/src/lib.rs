//! # calendar-engine
//!
//! Recurrence expansion and conflict detection for a month-view calendar.
//!
//! Stored events are expanded fresh for whatever month is on screen: a
//! recurring series only materializes inside a three-month window around the
//! viewed date. The flattened occurrence list then feeds rendering, search,
//! and the conflict check run before any create, edit or move is committed.
//! Every function here is pure; persistence and UI live with the caller.
//!
//! ## Modules
//!
//! - [`model`] — `Event`, `RecurrenceRule`, `Category`, stored document
//! - [`expander`] — series root + view date → occurrences in the window
//! - [`conflict`] — same-day overlap detection and classification
//! - [`time`] — `"HH:MM"` times, half-open ranges, date parsing and labels
//! - [`filter`] — search term and category selection
//! - [`grid`] — 42-cell month grid, per-day lookup, agenda grouping
//! - [`error`] — Error types

pub mod conflict;
pub mod error;
pub mod expander;
pub mod filter;
pub mod grid;
pub mod model;
pub mod time;

pub use conflict::{detect_conflicts, detect_conflicts_excluding, Conflict, ConflictKind};
pub use error::EngineError;
pub use expander::{expand, expand_all, ViewWindow};
pub use filter::EventFilter;
pub use grid::{agenda, events_on, month_grid, AgendaDay, GridDay};
pub use model::{
    default_categories, reschedule, CalendarDocument, Category, Event, RecurrenceRule,
    RecurrenceType,
};
pub use time::{format_date, format_event_time, is_same_day, parse_date, TimeOfDay, TimeRange};
