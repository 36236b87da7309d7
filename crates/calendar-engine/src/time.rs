//! Time-of-day values, half-open minute ranges, and the date parsing and
//! display helpers shared by the rest of the engine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::model::Event;

const MINUTES_PER_HOUR: u16 = 60;
const HOURS_PER_DAY: u16 = 24;

/// A wall-clock time with minute precision, written as 24-hour `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    /// Build a time from hour (0-23) and minute (0-59).
    ///
    /// # Errors
    /// Returns `EngineError::InvalidTime` when either component is out of range.
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if hour >= u32::from(HOURS_PER_DAY) || minute >= u32::from(MINUTES_PER_HOUR) {
            return Err(EngineError::InvalidTime(format!("{}:{:02}", hour, minute)));
        }
        Ok(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    pub fn hour(self) -> u32 {
        u32::from(self.minutes / MINUTES_PER_HOUR)
    }

    pub fn minute(self) -> u32 {
        u32::from(self.minutes % MINUTES_PER_HOUR)
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_since_midnight(self) -> u16 {
        self.minutes
    }

    /// 12-hour display form, e.g. `"9:05 AM"`, `"12:00 PM"`.
    pub fn to_12_hour(self) -> String {
        let hour = self.hour();
        let period = if hour >= 12 { "PM" } else { "AM" };
        let display_hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", display_hour, self.minute(), period)
    }
}

impl FromStr for TimeOfDay {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || EngineError::InvalidTime(s.to_string());
        let (hours, minutes) = s.trim().split_once(':').ok_or_else(invalid)?;

        let component = |part: &str| -> Result<u32> {
            if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };

        TimeOfDay::new(component(hours)?, component(minutes)?).map_err(|_| invalid())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// A half-open range of minutes `[start, end)` within one day.
///
/// A missing end time collapses the range to zero width, so it never
/// overlaps anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: u16,
    pub end: u16,
}

impl TimeRange {
    pub fn new(start: TimeOfDay, end: Option<TimeOfDay>) -> Self {
        let start = start.minutes_since_midnight();
        Self {
            start,
            end: end.map_or(start, TimeOfDay::minutes_since_midnight),
        }
    }

    /// Two ranges overlap iff `a.start < b.end && b.start < a.end`.
    /// Touching endpoints are not an overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Parse a stored calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 datetimes (`2024-01-15T00:00:00.000Z`) and
/// naive ISO datetimes. For datetimes only the written date component is kept.
///
/// # Errors
/// Returns `EngineError::InvalidDate` if none of the formats match.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|ndt| ndt.date())
        .map_err(|e| EngineError::InvalidDate(format!("'{}': {}", s, e)))
}

/// Whether two dates fall on the same calendar day.
pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a == b
}

/// Long display form, e.g. `"Monday, January 1, 2024"`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// The time label shown on an event card.
///
/// `"All day"` for all-day events, an empty string when there is no start
/// time, otherwise `"9:00 AM"` or `"9:00 AM - 10:30 AM"`.
pub fn format_event_time(event: &Event) -> String {
    if event.is_all_day {
        return "All day".to_string();
    }
    let Some(start) = event.start_time else {
        return String::new();
    };
    match event.end_time {
        Some(end) => format!("{} - {}", start.to_12_hour(), end.to_12_hour()),
        None => start.to_12_hour(),
    }
}

/// Serde adapters for `NaiveDate` fields stored by the persistence layer.
pub(crate) mod serde_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => super::serialize(date, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| super::super::parse_date(&raw).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}
