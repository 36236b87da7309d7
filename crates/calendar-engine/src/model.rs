//! Events, recurrence rules, categories, and the stored calendar document.
//!
//! Field names serialize in camelCase so the types read and write the JSON
//! the persistence layer stores without an intermediate DTO.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::trace;

use crate::time::{serde_date, TimeOfDay};

/// A scheduled item: either a one-off event, a series root carrying a
/// [`RecurrenceRule`], or a generated occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "serde_date")]
    pub start_date: NaiveDate,
    #[serde(with = "serde_date")]
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<TimeOfDay>,
    pub category_id: String,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
}

impl Event {
    /// A single-day event on `date` with no times and no recurrence.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        date: NaiveDate,
        category_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            start_date: date,
            end_date: date,
            start_time: None,
            end_time: None,
            category_id: category_id.into(),
            is_all_day: false,
            recurrence: None,
        }
    }

    /// Derive the occurrence of this series on `date`.
    ///
    /// The copy gets the id `"<id>-<epoch millis of date at 00:00 UTC>"`, a
    /// single-day span on `date`, and no recurrence rule.
    pub fn occurrence_on(&self, date: NaiveDate) -> Event {
        Event {
            id: occurrence_id(&self.id, date),
            start_date: date,
            end_date: date,
            recurrence: None,
            ..self.clone()
        }
    }

    /// Copy of this event moved to `date`, as a drag-and-drop drop does.
    ///
    /// Start and end collapse onto `date`; `start_time` is replaced only when
    /// a new time is given. Everything else, including the id and any
    /// recurrence rule, is kept.
    pub fn rescheduled(&self, date: NaiveDate, start_time: Option<TimeOfDay>) -> Event {
        Event {
            start_date: date,
            end_date: date,
            start_time: start_time.or(self.start_time),
            ..self.clone()
        }
    }
}

/// Free-function form of [`Event::rescheduled`].
pub fn reschedule(event: &Event, date: NaiveDate, start_time: Option<TimeOfDay>) -> Event {
    event.rescheduled(date, start_time)
}

fn occurrence_id(root_id: &str, date: NaiveDate) -> String {
    let millis = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    format!("{}-{}", root_id, millis)
}

/// Recurrence frequency tag.
///
/// Tags other than the four known ones are kept as `Unsupported` so stored
/// data from a newer front end still loads; both `Custom` and `Unsupported`
/// expand to the series root alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecurrenceType {
    Daily,
    Weekly,
    Monthly,
    Custom,
    Unsupported(String),
}

impl From<String> for RecurrenceType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "custom" => Self::Custom,
            _ => Self::Unsupported(tag),
        }
    }
}

impl From<RecurrenceType> for String {
    fn from(kind: RecurrenceType) -> Self {
        match kind {
            RecurrenceType::Daily => "daily".to_string(),
            RecurrenceType::Weekly => "weekly".to_string(),
            RecurrenceType::Monthly => "monthly".to_string(),
            RecurrenceType::Custom => "custom".to_string(),
            RecurrenceType::Unsupported(tag) => tag,
        }
    }
}

/// The repetition rule attached to a series root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    #[serde(rename = "type")]
    pub kind: RecurrenceType,
    /// Step between occurrences in days, weeks or months. Values below 1
    /// behave as 1; anything that is not an integer loads as 1.
    #[serde(default = "default_interval", deserialize_with = "lenient_interval")]
    pub interval: i64,
    #[serde(
        default,
        with = "serde_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,
    /// Weekday indices, 0 = Sunday through 6 = Saturday. Kept as stored;
    /// see [`RecurrenceRule::weekdays`] for the validated set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<i64>,
}

fn default_interval() -> i64 {
    1
}

/// Accept whatever the form stored for `interval`: `null`, floats, strings
/// and other non-integers fall back to 1.
fn lenient_interval<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_i64().unwrap_or_else(|| {
        trace!(%value, "non-integer interval, using 1");
        default_interval()
    }))
}

impl RecurrenceRule {
    pub fn new(kind: RecurrenceType, interval: i64) -> Self {
        Self {
            kind,
            interval,
            end_date: None,
            days_of_week: None,
            day_of_month: None,
        }
    }

    pub fn daily(interval: i64) -> Self {
        Self::new(RecurrenceType::Daily, interval)
    }

    pub fn weekly(interval: i64) -> Self {
        Self::new(RecurrenceType::Weekly, interval)
    }

    pub fn monthly(interval: i64) -> Self {
        Self::new(RecurrenceType::Monthly, interval)
    }

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn on_days<I>(mut self, days: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<i64>,
    {
        self.days_of_week = Some(days.into_iter().map(Into::into).collect());
        self
    }

    pub fn on_day_of_month(mut self, day: i64) -> Self {
        self.day_of_month = Some(day);
        self
    }

    /// The interval clamped to at least 1.
    pub fn step(&self) -> u32 {
        u32::try_from(self.interval.max(1)).unwrap_or(u32::MAX)
    }

    /// Configured weekdays, deduplicated and in Sunday-first order.
    ///
    /// Indices outside 0..=6 are dropped. An absent or empty list yields an
    /// empty set, meaning "one occurrence per step".
    pub fn weekdays(&self) -> Vec<Weekday> {
        let Some(days) = &self.days_of_week else {
            return Vec::new();
        };
        let unique: BTreeSet<u8> = days
            .iter()
            .filter_map(|&d| {
                let index = u8::try_from(d).ok().filter(|&i| i <= 6);
                if index.is_none() {
                    trace!(day = d, "ignoring out-of-range weekday index");
                }
                index
            })
            .collect();
        unique.into_iter().map(weekday_from_index).collect()
    }

    /// The pinned day of month. Zero or negative means "not pinned".
    pub fn pinned_day(&self) -> Option<u32> {
        self.day_of_month
            .and_then(|d| u32::try_from(d).ok())
            .filter(|&d| d > 0)
    }
}

/// Map a Sunday-first index (0..=6) onto a chrono weekday.
fn weekday_from_index(index: u8) -> Weekday {
    match index {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

/// A colour-coded label events point at by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// The categories a fresh calendar starts with.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("1", "Work", "#3B82F6"),
        Category::new("2", "Personal", "#10B981"),
        Category::new("3", "Health", "#F59E0B"),
        Category::new("4", "Social", "#EF4444"),
    ]
}

/// Everything the persistence layer keeps for one calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDocument {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,
}

impl CalendarDocument {
    /// Parse a stored document from JSON.
    ///
    /// # Errors
    /// Returns `EngineError::Json` for malformed JSON, bad dates or bad times.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }
}

impl Default for CalendarDocument {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            categories: default_categories(),
        }
    }
}
