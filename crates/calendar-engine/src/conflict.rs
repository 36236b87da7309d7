//! Detect scheduling conflicts between a candidate event and existing ones.
//!
//! Only events starting on the same calendar day are compared. All-day events
//! occupy the whole day; timed events occupy the half-open range
//! `[start, end)`, so back-to-back events are NOT conflicts.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::Event;
use crate::time::TimeRange;

/// How two conflicting events collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// The time ranges intersect.
    Overlap,
    /// Both events have a start time, and start and end times are identical.
    SameTime,
}

/// A detected conflict between the candidate (`event1`) and an existing event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub event1: Event,
    pub event2: Event,
    #[serde(rename = "type")]
    pub kind: ConflictKind,
}

/// Report every event in `existing` that overlaps `candidate`.
///
/// The candidate is not filtered out of `existing`; callers editing or moving
/// an event should use [`detect_conflicts_excluding`] or remove it first.
pub fn detect_conflicts(candidate: &Event, existing: &[Event]) -> Vec<Conflict> {
    collect_conflicts(candidate, existing.iter())
}

/// [`detect_conflicts`] after dropping entries that share the candidate's id,
/// for the edit and move paths where the stored copy is still in the list.
pub fn detect_conflicts_excluding(candidate: &Event, existing: &[Event]) -> Vec<Conflict> {
    collect_conflicts(candidate, existing.iter().filter(|e| e.id != candidate.id))
}

fn collect_conflicts<'a>(
    candidate: &Event,
    existing: impl Iterator<Item = &'a Event>,
) -> Vec<Conflict> {
    let conflicts: Vec<Conflict> = existing
        .filter(|other| events_overlap(candidate, other))
        .map(|other| Conflict {
            event1: candidate.clone(),
            event2: other.clone(),
            kind: classify(candidate, other),
        })
        .collect();

    if !conflicts.is_empty() {
        debug!(
            event_id = %candidate.id,
            count = conflicts.len(),
            "conflicts detected"
        );
    }
    conflicts
}

/// Whether two events occupy overlapping time on the same start day.
pub fn events_overlap(a: &Event, b: &Event) -> bool {
    if a.start_date != b.start_date {
        return false;
    }
    if a.is_all_day || b.is_all_day {
        return true;
    }
    let (Some(a_start), Some(b_start)) = (a.start_time, b.start_time) else {
        return false;
    };
    TimeRange::new(a_start, a.end_time).overlaps(&TimeRange::new(b_start, b.end_time))
}

/// `SameTime` needs a start time on both sides; untimed pairs (all-day
/// collisions) are always `Overlap`.
fn classify(a: &Event, b: &Event) -> ConflictKind {
    match (a.start_time, b.start_time) {
        (Some(a_start), Some(b_start)) if a_start == b_start && a.end_time == b.end_time => {
            ConflictKind::SameTime
        }
        _ => ConflictKind::Overlap,
    }
}
