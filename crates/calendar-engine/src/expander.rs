//! Recurrence expansion -- turns a series root into the concrete occurrences
//! visible around the month being viewed.
//!
//! Expansion is bounded by a [`ViewWindow`]: the viewed month plus one month
//! on either side. Series are never materialized beyond it, so the result is
//! recomputed whenever the view moves.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use tracing::debug;

use crate::model::{Event, RecurrenceRule, RecurrenceType};

/// The inclusive date range occurrences are generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewWindow {
    /// First day of the month before the viewed month.
    pub start: NaiveDate,
    /// Last day of the month after the viewed month.
    pub end: NaiveDate,
}

impl ViewWindow {
    /// The three-month window centred on `view_date`'s month.
    pub fn around(view_date: NaiveDate) -> Self {
        let first = first_of_month(view_date);
        let start = first
            .checked_sub_months(Months::new(1))
            .unwrap_or(NaiveDate::MIN);
        let end = first
            .checked_add_months(Months::new(2))
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Expand one stored event into the occurrences visible around `view_date`.
///
/// A non-recurring event is returned as-is, without window filtering. For a
/// series root the result holds the root itself (when it starts inside the
/// window) followed by every generated occurrence inside the window. Callers
/// must not rely on the ordering.
///
/// `Custom` and unrecognized rule types generate nothing beyond the root.
pub fn expand(event: &Event, view_date: NaiveDate) -> Vec<Event> {
    let Some(rule) = &event.recurrence else {
        return vec![event.clone()];
    };

    let window = ViewWindow::around(view_date);
    let mut occurrences = Vec::new();
    if window.contains(event.start_date) {
        occurrences.push(event.clone());
    }
    occurrences.extend(
        occurrence_dates(event.start_date, rule, &window)
            .into_iter()
            .map(|date| event.occurrence_on(date)),
    );

    debug!(
        event_id = %event.id,
        window_start = %window.start,
        window_end = %window.end,
        count = occurrences.len(),
        "expanded recurring event"
    );
    occurrences
}

/// Expand every stored event and flatten the result, the list a month view
/// renders and conflict checks run against.
pub fn expand_all(events: &[Event], view_date: NaiveDate) -> Vec<Event> {
    events
        .iter()
        .flat_map(|event| expand(event, view_date))
        .collect()
}

/// Dates generated by `rule` for a series starting on `root`, excluding the
/// root itself.
fn occurrence_dates(root: NaiveDate, rule: &RecurrenceRule, window: &ViewWindow) -> Vec<NaiveDate> {
    // Nothing is generated past the rule's end date or the window.
    let horizon = rule
        .end_date
        .map_or(window.end, |until| until.min(window.end));
    let step = rule.step();
    let mut dates = Vec::new();

    match &rule.kind {
        RecurrenceType::Daily => {
            let stride = Days::new(u64::from(step));
            step_through(root, horizon, window, &mut dates, |d| {
                d.checked_add_days(stride)
            });
        }
        RecurrenceType::Weekly => {
            let stride = Days::new(7 * u64::from(step));
            let weekdays = rule.weekdays();
            if weekdays.is_empty() {
                step_through(root, horizon, window, &mut dates, |d| {
                    d.checked_add_days(stride)
                });
            } else {
                let mut anchor = root;
                while anchor <= horizon {
                    for &weekday in &weekdays {
                        let Some(date) = next_weekday_after(anchor, weekday) else {
                            continue;
                        };
                        if date > root && date <= horizon && window.contains(date) {
                            dates.push(date);
                        }
                    }
                    match anchor.checked_add_days(stride) {
                        Some(next) => anchor = next,
                        None => break,
                    }
                }
            }
        }
        RecurrenceType::Monthly => {
            let pinned = rule.pinned_day();
            step_through(root, horizon, window, &mut dates, |d| {
                let moved = add_months_rolling(d, step)?;
                match pinned {
                    Some(day) => set_day_rolling(moved, day),
                    None => Some(moved),
                }
            });
        }
        RecurrenceType::Custom | RecurrenceType::Unsupported(_) => {
            debug!(kind = ?rule.kind, "recurrence type has no expansion, keeping root only");
        }
    }

    dates
}

/// Walk anchors forward from `root` with `advance`, recording each new anchor
/// that lands in the window. Stops once the anchor passes `horizon`, or when
/// `advance` fails to move forward.
fn step_through(
    root: NaiveDate,
    horizon: NaiveDate,
    window: &ViewWindow,
    dates: &mut Vec<NaiveDate>,
    advance: impl Fn(NaiveDate) -> Option<NaiveDate>,
) {
    let mut anchor = root;
    while anchor <= horizon {
        let Some(next) = advance(anchor) else {
            break;
        };
        if next <= anchor {
            break;
        }
        if next > root && next <= horizon && window.contains(next) {
            dates.push(next);
        }
        anchor = next;
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// The first date with `weekday` strictly after `date` (1 to 7 days later).
fn next_weekday_after(date: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let current = date.weekday().num_days_from_sunday();
    let target = weekday.num_days_from_sunday();
    let ahead = match (target + 7 - current) % 7 {
        0 => 7,
        n => n,
    };
    date.checked_add_days(Days::new(u64::from(ahead)))
}

/// Move `date` forward by `months`, keeping its day number and letting days
/// past the end of the target month roll into the next one
/// (Jan 31 + 1 month = Mar 2 in a leap year).
fn add_months_rolling(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    first_of_month(date)
        .checked_add_months(Months::new(months))?
        .checked_add_days(Days::new(u64::from(date.day0())))
}

/// Set the day number within `date`'s month, rolling past the month end
/// (day 31 of April = May 1). `day` must be at least 1.
fn set_day_rolling(date: NaiveDate, day: u32) -> Option<NaiveDate> {
    first_of_month(date).checked_add_days(Days::new(u64::from(day.saturating_sub(1))))
}
