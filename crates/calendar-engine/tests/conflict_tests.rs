//! Tests for same-day conflict detection.

use calendar_engine::{detect_conflicts, detect_conflicts_excluding, ConflictKind, Event};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Helper to create a timed event on 2026-03-01 unless `day` says otherwise.
fn timed(id: &str, day: u32, start: &str, end: Option<&str>) -> Event {
    let mut event = Event::new(id, id, date(2026, 3, day), "1");
    event.start_time = Some(start.parse().unwrap());
    event.end_time = end.map(|e| e.parse().unwrap());
    event
}

fn all_day(id: &str, day: u32) -> Event {
    let mut event = Event::new(id, id, date(2026, 3, day), "1");
    event.is_all_day = true;
    event
}

#[test]
fn overlapping_events_detected() {
    // 09:00-10:00 vs 09:30-10:30
    let candidate = timed("a", 1, "09:00", Some("10:00"));
    let existing = vec![timed("b", 1, "09:30", Some("10:30"))];

    let conflicts = detect_conflicts(&candidate, &existing);

    assert_eq!(conflicts.len(), 1, "should detect exactly one conflict");
    assert_eq!(conflicts[0].kind, ConflictKind::Overlap);
    assert_eq!(conflicts[0].event1.id, "a");
    assert_eq!(conflicts[0].event2.id, "b");
}

#[test]
fn adjacent_events_not_a_conflict() {
    // 09:00-10:00 vs 10:00-11:00 -> touching, NOT overlapping
    let candidate = timed("a", 1, "09:00", Some("10:00"));
    let existing = vec![timed("b", 1, "10:00", Some("11:00"))];

    assert!(
        detect_conflicts(&candidate, &existing).is_empty(),
        "adjacent events (end == start) should not be conflicts"
    );
}

#[test]
fn identical_times_are_same_time() {
    let candidate = timed("a", 1, "14:00", Some("15:00"));
    let existing = vec![timed("b", 1, "14:00", Some("15:00"))];

    let conflicts = detect_conflicts(&candidate, &existing);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kind, ConflictKind::SameTime);
}

#[test]
fn same_start_different_end_is_overlap() {
    let candidate = timed("a", 1, "14:00", Some("15:00"));
    let existing = vec![timed("b", 1, "14:00", Some("14:30"))];

    let conflicts = detect_conflicts(&candidate, &existing);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kind, ConflictKind::Overlap);
}

#[test]
fn different_days_never_conflict() {
    let candidate = timed("a", 1, "09:00", Some("10:00"));
    let existing = vec![timed("b", 2, "09:00", Some("10:00")), all_day("c", 2)];

    assert!(detect_conflicts(&candidate, &existing).is_empty());
}

#[test]
fn all_day_conflicts_with_anything_that_day() {
    let candidate = all_day("a", 1);
    let existing = vec![
        timed("b", 1, "07:00", Some("07:30")),
        Event::new("c", "untimed", date(2026, 3, 1), "2"),
        timed("d", 2, "07:00", Some("07:30")),
    ];

    let conflicts = detect_conflicts(&candidate, &existing);

    let ids: Vec<&str> = conflicts.iter().map(|c| c.event2.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c"]);
    assert!(conflicts.iter().all(|c| c.kind == ConflictKind::Overlap));
}

#[test]
fn two_all_day_events_are_an_overlap_not_same_time() {
    let candidate = all_day("a", 1);
    let existing = vec![all_day("b", 1)];

    let conflicts = detect_conflicts(&candidate, &existing);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kind, ConflictKind::Overlap);
}

#[test]
fn all_day_pair_with_identical_times_is_same_time() {
    let mut candidate = timed("a", 1, "09:00", Some("10:00"));
    candidate.is_all_day = true;
    let mut other = timed("b", 1, "09:00", Some("10:00"));
    other.is_all_day = true;

    let conflicts = detect_conflicts(&candidate, &[other]);
    assert_eq!(conflicts[0].kind, ConflictKind::SameTime);
}

#[test]
fn timed_candidate_conflicts_with_all_day_existing() {
    let candidate = timed("a", 1, "12:00", Some("13:00"));
    let existing = vec![all_day("b", 1)];

    assert_eq!(detect_conflicts(&candidate, &existing).len(), 1);
}

#[test]
fn missing_start_time_means_no_conflict() {
    let candidate = Event::new("a", "untimed", date(2026, 3, 1), "1");
    let existing = vec![timed("b", 1, "09:00", Some("17:00"))];

    assert!(detect_conflicts(&candidate, &existing).is_empty());
    assert!(detect_conflicts(&existing[0], &[candidate]).is_empty());
}

#[test]
fn missing_end_time_is_zero_width() {
    // A point in time at 09:30 sits inside 09:00-10:00.
    let candidate = timed("a", 1, "09:30", None);
    let inside = vec![timed("b", 1, "09:00", Some("10:00"))];
    assert_eq!(detect_conflicts(&candidate, &inside).len(), 1);

    // Two zero-width events at the same instant do not intersect.
    let same_instant = vec![timed("c", 1, "09:30", None)];
    assert!(detect_conflicts(&candidate, &same_instant).is_empty());
}

#[test]
fn multi_day_events_compare_start_date_only() {
    let mut long = timed("a", 1, "09:00", Some("10:00"));
    long.end_date = date(2026, 3, 3);
    let existing = vec![timed("b", 2, "09:00", Some("10:00"))];

    assert!(detect_conflicts(&long, &existing).is_empty());
}

#[test]
fn candidate_is_not_deduplicated_by_id() {
    let candidate = timed("a", 1, "09:00", Some("10:00"));
    let existing = vec![candidate.clone()];

    let conflicts = detect_conflicts(&candidate, &existing);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kind, ConflictKind::SameTime);

    assert!(detect_conflicts_excluding(&candidate, &existing).is_empty());
}

#[test]
fn every_overlapping_event_reported_in_order() {
    let candidate = timed("a", 1, "09:00", Some("12:00"));
    let existing = vec![
        timed("b", 1, "08:00", Some("09:30")),
        timed("c", 1, "12:00", Some("13:00")),
        timed("d", 1, "10:00", Some("11:00")),
    ];

    let conflicts = detect_conflicts(&candidate, &existing);

    let ids: Vec<&str> = conflicts.iter().map(|c| c.event2.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "d"]);
}

#[test]
fn empty_existing_list_no_conflicts() {
    let candidate = timed("a", 1, "09:00", Some("10:00"));
    assert!(detect_conflicts(&candidate, &[]).is_empty());
}

#[test]
fn detection_is_idempotent() {
    let candidate = timed("a", 1, "09:00", Some("10:00"));
    let existing = vec![timed("b", 1, "09:30", Some("10:30")), all_day("c", 1)];

    assert_eq!(
        detect_conflicts(&candidate, &existing),
        detect_conflicts(&candidate, &existing)
    );
}
