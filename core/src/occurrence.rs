// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Projection of stored events into concrete occurrences for a time range.

use jiff::Timestamp;
use jiff::tz::Offset;
use serde::Serialize;

use crate::datetime::{OffsetDateTime, ZoneResolver, parse_timestamp};
use crate::event::{Event, EventInfo, RecurringEvent};
use crate::expand::{ExpandMode, ExpandRequest, Expander};
use crate::Error;

/// Joins the series identifier and the start instant of a generated occurrence.
pub const OCCURRENCE_DELIMITER: char = '@';

/// An inclusive query range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    start: String,
    end: String,
    start_instant: Timestamp,
    end_instant: Timestamp,
}

impl TimeRange {
    /// Parses both bounds as offset-qualified instants.
    pub fn parse(start: &str, end: &str) -> Result<Self, Error> {
        let parse = |s: &str| {
            OffsetDateTime::parse(s)
                .and_then(|a| a.timestamp())
                .map_err(|_| Error::InvalidRange(s.to_string()))
        };
        Ok(Self {
            start_instant: parse(start)?,
            end_instant: parse(end)?,
            start: start.to_string(),
            end: end.to_string(),
        })
    }

    /// The lower bound as given.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// The upper bound as given.
    pub fn end(&self) -> &str {
        &self.end
    }

    /// The lower bound as an instant.
    pub fn start_instant(&self) -> Timestamp {
        self.start_instant
    }

    /// The upper bound as an instant.
    pub fn end_instant(&self) -> Timestamp {
        self.end_instant
    }

    /// Whether an event spanning `[start, end]` touches this range.
    pub fn overlaps(&self, start: Timestamp, end: Option<Timestamp>) -> bool {
        start <= self.end_instant && end.unwrap_or(start) >= self.start_instant
    }
}

/// A concrete event in a listing, either a stored single or a generated occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    /// The event identifier, `<series id>@<start>` for generated occurrences.
    pub id: String,

    /// The series this occurrence was generated from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_id: Option<String>,

    /// The start instant.
    pub start: String,

    /// The end instant, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    /// Title, place and participants.
    #[serde(flatten)]
    pub info: EventInfo,
}

impl Occurrence {
    /// Whether this occurrence was generated from a series.
    pub fn is_generated(&self) -> bool {
        self.series_id.is_some()
    }
}

/// Generates the occurrences of a series touching the range.
///
/// The generator runs from `range.start - duration` so that occurrences which
/// begin before the range but are still running inside it are kept.
pub fn materialize(
    resolver: &ZoneResolver,
    series: &RecurringEvent,
    range: &TimeRange,
    mode: ExpandMode,
) -> Result<Vec<Occurrence>, Error> {
    let rule = series.rule()?;
    let duration = series.duration()?;

    let lower = match duration {
        Some(d) if d.is_positive() => {
            let lower = range
                .start_instant()
                .checked_sub(d)
                .unwrap_or(range.start_instant());
            OffsetDateTime::new(Offset::UTC.to_datetime(lower), Offset::UTC).to_string()
        }
        _ => range.start().to_string(),
    };

    let starts = Expander::new(resolver).expand(&ExpandRequest {
        anchor: &series.start,
        tz: &series.tz,
        rule: &rule,
        range_start: &lower,
        range_end: range.end(),
        exceptions: &series.exceptions,
        mode,
    })?;

    let mut occurrences = Vec::with_capacity(starts.len());
    for start in starts {
        let start_instant = parse_timestamp(&start)?;
        let (end, end_instant) = match duration {
            Some(d) => {
                let end_instant = start_instant
                    .checked_add(d)
                    .map_err(|_| Error::InvalidEvent(format!("end of {start} is out of range")))?;
                let end = resolver.format_in_time_zone(end_instant, &series.tz)?;
                (Some(end), Some(end_instant))
            }
            None => (None, None),
        };
        if !range.overlaps(start_instant, end_instant) {
            continue;
        }

        occurrences.push(Occurrence {
            id: format!("{}{OCCURRENCE_DELIMITER}{start}", series.id),
            series_id: Some(series.id.clone()),
            start,
            end,
            info: series.info.clone(),
        });
    }
    Ok(occurrences)
}

/// Lists every event and generated occurrence touching the range, ascending by start.
pub fn collect_range<'a>(
    resolver: &ZoneResolver,
    events: impl IntoIterator<Item = &'a Event>,
    range: &TimeRange,
) -> Result<Vec<Occurrence>, Error> {
    let mut items = Vec::new();
    for event in events {
        match event {
            Event::Single(e) => {
                let start = parse_timestamp(&e.start)?;
                let end = e.end.as_deref().map(parse_timestamp).transpose()?;
                if range.overlaps(start, end) {
                    items.push((
                        start,
                        Occurrence {
                            id: e.id.clone(),
                            series_id: None,
                            start: e.start.clone(),
                            end: e.end.clone(),
                            info: e.info.clone(),
                        },
                    ));
                }
            }
            Event::Recurring(series) => {
                for occurrence in materialize(resolver, series, range, ExpandMode::WallClock)? {
                    items.push((parse_timestamp(&occurrence.start)?, occurrence));
                }
            }
        }
    }

    items.sort_by_key(|(start, _)| *start);
    tracing::debug!(count = items.len(), from = range.start(), to = range.end(), "collected range");
    Ok(items.into_iter().map(|(_, o)| o).collect())
}
