//! Tests for reading and writing the stored calendar JSON.

use calendar_engine::{detect_conflicts, CalendarDocument, ConflictKind, Event, RecurrenceType};
use chrono::NaiveDate;
use serde_json::{json, Value};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn stored_document() -> &'static str {
    r#"{
        "events": [
            {
                "id": "1717000000000",
                "title": "Standup",
                "startDate": "2024-01-01T00:00:00.000Z",
                "endDate": "2024-01-01T00:00:00.000Z",
                "startTime": "09:00",
                "endTime": "09:15",
                "categoryId": "1",
                "recurrence": {
                    "type": "weekly",
                    "interval": 1,
                    "daysOfWeek": [1, 3],
                    "endDate": "2024-03-31"
                }
            },
            {
                "id": "1717000000001",
                "title": "Offsite",
                "description": "All hands",
                "startDate": "2024-01-10",
                "endDate": "2024-01-11",
                "categoryId": "1",
                "isAllDay": true
            }
        ]
    }"#
}

#[test]
fn parses_stored_document() {
    let doc = CalendarDocument::from_json(stored_document()).unwrap();

    assert_eq!(doc.events.len(), 2);
    let standup = &doc.events[0];
    assert_eq!(standup.start_date, date(2024, 1, 1));
    assert_eq!(standup.start_time.unwrap().to_string(), "09:00");
    assert!(!standup.is_all_day);
    let rule = standup.recurrence.as_ref().unwrap();
    assert_eq!(rule.kind, RecurrenceType::Weekly);
    assert_eq!(rule.days_of_week, Some(vec![1, 3]));
    assert_eq!(rule.end_date, Some(date(2024, 3, 31)));

    let offsite = &doc.events[1];
    assert!(offsite.is_all_day);
    assert_eq!(offsite.end_date, date(2024, 1, 11));
    assert_eq!(offsite.description.as_deref(), Some("All hands"));
}

#[test]
fn missing_categories_fall_back_to_defaults() {
    let doc = CalendarDocument::from_json(stored_document()).unwrap();

    let names: Vec<&str> = doc.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Work", "Personal", "Health", "Social"]);
    assert_eq!(doc.category("3").unwrap().color, "#F59E0B");
    assert!(doc.category("99").is_none());
}

#[test]
fn missing_interval_defaults_to_one() {
    let json = r#"{"type":"daily"}"#;
    let rule: calendar_engine::RecurrenceRule = serde_json::from_str(json).unwrap();
    assert_eq!(rule.interval, 1);
    assert_eq!(rule.step(), 1);
}

#[test]
fn null_or_non_integer_interval_loads_as_one() {
    for json in [
        r#"{"type":"daily","interval":null}"#,
        r#"{"type":"daily","interval":2.5}"#,
        r#"{"type":"daily","interval":"3"}"#,
    ] {
        let rule: calendar_engine::RecurrenceRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.interval, 1, "{}", json);
    }
}

#[test]
fn out_of_range_weekdays_load_and_are_ignored() {
    let json = r#"{"type":"weekly","interval":1,"daysOfWeek":[-1,1,7]}"#;
    let rule: calendar_engine::RecurrenceRule = serde_json::from_str(json).unwrap();

    assert_eq!(rule.days_of_week, Some(vec![-1, 1, 7]));
    assert_eq!(rule.weekdays(), vec![chrono::Weekday::Mon]);
}

#[test]
fn document_with_sloppy_rules_still_loads() {
    let json = r#"{"events":[{"id":"r","title":"R","startDate":"2024-01-01","endDate":"2024-01-01",
        "categoryId":"1","recurrence":{"type":"weekly","interval":null,"daysOfWeek":[7,-1],"dayOfMonth":-3}}]}"#;

    let doc = CalendarDocument::from_json(json).unwrap();
    let rule = doc.events[0].recurrence.as_ref().unwrap();
    assert_eq!(rule.step(), 1);
    assert!(rule.weekdays().is_empty());
    assert_eq!(rule.pinned_day(), None);
}

#[test]
fn unknown_recurrence_type_still_loads() {
    let json = r#"{"type":"yearly","interval":1}"#;
    let rule: calendar_engine::RecurrenceRule = serde_json::from_str(json).unwrap();
    assert_eq!(rule.kind, RecurrenceType::Unsupported("yearly".to_string()));

    // And is written back unchanged.
    let back = serde_json::to_value(&rule).unwrap();
    assert_eq!(back["type"], "yearly");
}

#[test]
fn malformed_time_is_rejected() {
    let json = r#"{"events":[{"id":"x","title":"x","startDate":"2024-01-01","endDate":"2024-01-01","startTime":"25:00","categoryId":"1"}]}"#;
    assert!(CalendarDocument::from_json(json).is_err());
}

#[test]
fn malformed_date_is_rejected() {
    let json = r#"{"events":[{"id":"x","title":"x","startDate":"01/01/2024","endDate":"2024-01-01","categoryId":"1"}]}"#;
    assert!(CalendarDocument::from_json(json).is_err());
}

#[test]
fn event_serializes_in_camel_case_with_plain_dates() {
    let mut event = Event::new("e1", "Review", date(2024, 2, 29), "2");
    event.start_time = Some("16:05".parse().unwrap());

    let value = serde_json::to_value(&event).unwrap();

    assert_eq!(
        value,
        json!({
            "id": "e1",
            "title": "Review",
            "startDate": "2024-02-29",
            "endDate": "2024-02-29",
            "startTime": "16:05",
            "categoryId": "2",
            "isAllDay": false
        })
    );
}

#[test]
fn conflict_serializes_kind_as_type() {
    let mut a = Event::new("a", "A", date(2024, 2, 1), "1");
    a.start_time = Some("10:00".parse().unwrap());
    a.end_time = Some("11:00".parse().unwrap());
    let mut b = a.clone();
    b.id = "b".to_string();

    let conflicts = detect_conflicts(&a, &[b]);
    assert_eq!(conflicts[0].kind, ConflictKind::SameTime);

    let value: Value = serde_json::to_value(&conflicts[0]).unwrap();
    assert_eq!(value["type"], "same_time");
    assert_eq!(value["event1"]["id"], "a");
    assert_eq!(value["event2"]["id"], "b");
}
