//! `calendar` CLI — expand, search and conflict-check a stored calendar.
//!
//! The input is the calendar document the front end persists:
//! `{"events": [...], "categories": [...]}`.
//!
//! ## Usage
//!
//! ```sh
//! # Occurrences visible around March 2024, as JSON
//! calendar expand -i calendar.json --view-date 2024-03-15
//!
//! # Would this new or edited event clash with anything?
//! calendar conflicts -i calendar.json --candidate new-event.json
//!
//! # Search titles/descriptions, restricted to two categories
//! cat calendar.json | calendar search --query standup --category 1 --category 3
//!
//! # Day-by-day listing of the window
//! calendar agenda -i calendar.json
//!
//! # Month grid, marking days that have events
//! calendar grid --view-date 2024-02-01 -i calendar.json
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`
//! (default `calendar=info`).

use anyhow::{Context, Result};
use calendar_engine::{
    agenda, detect_conflicts_excluding, events_on, expand_all, format_date, format_event_time,
    month_grid, parse_date, CalendarDocument, Event, EventFilter,
};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Read};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "calendar",
    version,
    about = "Recurrence expansion and conflict checks for a stored calendar"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand that reads the stored calendar.
#[derive(Args)]
struct Source {
    /// Calendar document (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
    /// Date whose month is being viewed (YYYY-MM-DD, defaults to today)
    #[arg(long, env = "CALENDAR_VIEW_DATE", value_parser = parse_view_date)]
    view_date: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand every event into the occurrences around the viewed month
    Expand {
        #[command(flatten)]
        source: Source,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// List existing events that clash with a candidate event
    Conflicts {
        #[command(flatten)]
        source: Source,
        /// JSON file holding the candidate event ("-" for stdin)
        #[arg(short, long)]
        candidate: String,
        /// Exit with status 2 when any conflict is found
        #[arg(long)]
        fail_on_conflict: bool,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Filter expanded events by search term and categories
    Search {
        #[command(flatten)]
        source: Source,
        /// Case-insensitive text matched against titles and descriptions
        #[arg(short, long, default_value = "")]
        query: String,
        /// Category id to include (repeatable; all categories if omitted)
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print expanded events grouped by day
    Agenda {
        #[command(flatten)]
        source: Source,
    },
    /// Print the month grid, marking days that have events
    Grid {
        /// Calendar document used to mark busy days (no stdin fallback)
        #[arg(short, long)]
        input: Option<String>,
        /// Date whose month is shown (YYYY-MM-DD, defaults to today)
        #[arg(long, env = "CALENDAR_VIEW_DATE", value_parser = parse_view_date)]
        view_date: Option<NaiveDate>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("calendar=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Expand { source, pretty } => {
            let (_, expanded) = load_expanded(&source)?;
            write_output(source.output.as_deref(), &to_json(&expanded, pretty)?)?;
        }
        Commands::Conflicts {
            source,
            candidate,
            fail_on_conflict,
            pretty,
        } => {
            let candidate_json = if candidate == "-" {
                anyhow::ensure!(
                    source.input.is_some(),
                    "--candidate - needs the calendar passed with --input (stdin is taken)"
                );
                read_input(None)?
            } else {
                read_input(Some(&candidate))?
            };
            let candidate: Event =
                serde_json::from_str(&candidate_json).context("Failed to parse candidate event")?;
            let source = Source {
                view_date: source.view_date.or(Some(candidate.start_date)),
                ..source
            };
            let (_, expanded) = load_expanded(&source)?;

            let conflicts = detect_conflicts_excluding(&candidate, &expanded);
            info!(
                candidate = %candidate.id,
                count = conflicts.len(),
                "conflict check finished"
            );
            write_output(source.output.as_deref(), &to_json(&conflicts, pretty)?)?;

            if fail_on_conflict && !conflicts.is_empty() {
                std::process::exit(2);
            }
        }
        Commands::Search {
            source,
            query,
            categories,
            pretty,
        } => {
            let (_, expanded) = load_expanded(&source)?;
            let filter = EventFilter::new()
                .with_search(&query)
                .with_categories(categories);
            let matches = filter.apply(&expanded);
            write_output(source.output.as_deref(), &to_json(&matches, pretty)?)?;
        }
        Commands::Agenda { source } => {
            let (doc, expanded) = load_expanded(&source)?;
            write_output(source.output.as_deref(), &render_agenda(&doc, &expanded))?;
        }
        Commands::Grid { input, view_date } => {
            let view = view_date.unwrap_or_else(today);
            let events = match input.as_deref() {
                Some(path) => {
                    let doc = load_document(Some(path))?;
                    expand_all(&doc.events, view)
                }
                None => Vec::new(),
            };
            print!("{}", render_grid(view, &events));
        }
    }

    Ok(())
}

fn parse_view_date(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn load_document(path: Option<&str>) -> Result<CalendarDocument> {
    let json = read_input(path)?;
    let doc = CalendarDocument::from_json(&json).context("Failed to parse calendar document")?;
    info!(
        events = doc.events.len(),
        categories = doc.categories.len(),
        "loaded calendar"
    );
    Ok(doc)
}

/// Load the document and expand it for the requested view date.
fn load_expanded(source: &Source) -> Result<(CalendarDocument, Vec<Event>)> {
    let doc = load_document(source.input.as_deref())?;
    let view = source.view_date.unwrap_or_else(today);
    let expanded = expand_all(&doc.events, view);
    info!(view_date = %view, occurrences = expanded.len(), "expanded calendar");
    Ok((doc, expanded))
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    let mut json = json.context("Failed to serialize output")?;
    json.push('\n');
    Ok(json)
}

fn render_agenda(doc: &CalendarDocument, events: &[Event]) -> String {
    let mut out = String::new();
    let days = agenda(events);
    if days.is_empty() {
        out.push_str("No events found\n");
        return out;
    }
    for day in days {
        out.push_str(&format_date(day.date));
        out.push('\n');
        for event in day.events {
            let category = doc
                .category(&event.category_id)
                .map_or("Unknown", |c| c.name.as_str());
            let time = format_event_time(event);
            if time.is_empty() {
                out.push_str(&format!("  {} [{}]\n", event.title, category));
            } else {
                out.push_str(&format!("  {}  {} [{}]\n", time, event.title, category));
            }
        }
    }
    out
}

/// Text month grid. Days outside the month are dimmed to `·`; busy days carry
/// a trailing `*`.
fn render_grid(view: NaiveDate, events: &[Event]) -> String {
    let mut out = format!("{}\n", view.format("%B %Y"));
    out.push_str("Su  Mo  Tu  We  Th  Fr  Sa\n");
    for week in month_grid(view).chunks(7) {
        let cells: Vec<String> = week
            .iter()
            .map(|cell| {
                if !cell.in_month {
                    return " · ".to_string();
                }
                let marker = if events_on(cell.date, events).is_empty() {
                    ' '
                } else {
                    '*'
                };
                format!("{:>2}{}", cell.date.day(), marker)
            })
            .collect();
        out.push_str(cells.join(" ").trim_end());
        out.push('\n');
    }
    out
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
