//! Month grid layout and per-day grouping for rendering.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use crate::model::Event;
use crate::time::is_same_day;

/// Cells in a month grid: six Sunday-first weeks.
pub const GRID_CELLS: usize = 42;

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridDay {
    pub date: NaiveDate,
    /// False for the padding days borrowed from the neighbouring months.
    pub in_month: bool,
}

/// The 42 dates shown for `view_date`'s month.
///
/// Leading cells are the tail of the previous month back to the Sunday on or
/// before the 1st; trailing cells continue into the next month until the grid
/// is full.
pub fn month_grid(view_date: NaiveDate) -> Vec<GridDay> {
    let first = view_date.with_day(1).unwrap_or(view_date);
    let lead = u64::from(first.weekday().num_days_from_sunday());
    let Some(grid_start) = first.checked_sub_days(Days::new(lead)) else {
        return Vec::new();
    };
    let next_month = first.checked_add_months(Months::new(1));

    grid_start
        .iter_days()
        .take(GRID_CELLS)
        .map(|date| GridDay {
            date,
            in_month: date >= first && next_month.is_none_or(|next| date < next),
        })
        .collect()
}

/// Events starting on `date`, in input order.
pub fn events_on(date: NaiveDate, events: &[Event]) -> Vec<&Event> {
    events
        .iter()
        .filter(|e| is_same_day(e.start_date, date))
        .collect()
}

/// A day's worth of events in the agenda list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaDay<'a> {
    pub date: NaiveDate,
    pub events: Vec<&'a Event>,
}

/// Group events by start date, earliest day first. Events keep their input
/// order within a day.
pub fn agenda(events: &[Event]) -> Vec<AgendaDay<'_>> {
    let mut days: BTreeMap<NaiveDate, Vec<&Event>> = BTreeMap::new();
    for event in events {
        days.entry(event.start_date).or_default().push(event);
    }
    days.into_iter()
        .map(|(date, events)| AgendaDay { date, events })
        .collect()
}
