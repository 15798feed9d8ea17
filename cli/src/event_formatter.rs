// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Cow, fmt};

use colored::Color;
use jiff::Timestamp;
use serde::Serialize;
use wallcal_core::{Event, Occurrence, parse_timestamp};

use crate::table::{PaddingDirection, Table, TableColumn};
use crate::util::{OutputFormat, format_datetime, format_span, short_id};

/// Formats rows either as an aligned table or as a JSON array.
#[derive(Debug)]
pub struct Formatter<C> {
    columns: Vec<C>,
    format: OutputFormat,
    header: bool,
}

impl<C> Formatter<C> {
    pub fn new(columns: Vec<C>, format: OutputFormat) -> Self {
        Self {
            columns,
            format,
            header: false,
        }
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn format<'a, T>(&'a self, data: &'a [T]) -> Display<'a, T, C> {
        Display {
            data,
            formatter: self,
        }
    }
}

pub struct Display<'a, T, C> {
    data: &'a [T],
    formatter: &'a Formatter<C>,
}

impl<T: Serialize, C: TableColumn<T>> fmt::Display for Display<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.formatter.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(self.data).map_err(|_| fmt::Error)?;
                writeln!(f, "{json}")
            }
            OutputFormat::Table => {
                let table = Table::new(&self.formatter.columns, self.data)
                    .with_header(self.formatter.header);
                write!(f, "{table}")
            }
        }
    }
}

/// Columns of an occurrence listing.
#[derive(Debug, Clone, Copy)]
pub enum OccurrenceColumn {
    Id,
    FullId,
    TimeSpan,
    Title,
    Place,
    Participants,
    /// Dims occurrences that already ended.
    Status { now: Timestamp },
}

impl OccurrenceColumn {
    pub fn columns(now: Timestamp, verbose: bool) -> Vec<Self> {
        if verbose {
            vec![
                Self::FullId,
                Self::TimeSpan,
                Self::Title,
                Self::Place,
                Self::Participants,
            ]
        } else {
            vec![Self::Id, Self::Status { now }, Self::TimeSpan, Self::Title]
        }
    }
}

impl TableColumn<Occurrence> for OccurrenceColumn {
    fn name(&self) -> Cow<'_, str> {
        match self {
            Self::Id | Self::FullId => "ID",
            Self::TimeSpan => "Time",
            Self::Title => "Title",
            Self::Place => "Place",
            Self::Participants => "Participants",
            Self::Status { .. } => "",
        }
        .into()
    }

    fn format<'a>(&self, data: &'a Occurrence) -> Cow<'a, str> {
        match self {
            Self::Id => match &data.series_id {
                Some(series) => format!("{}*", short_id(series)).into(),
                None => short_id(&data.id).into(),
            },
            Self::FullId => data.id.as_str().into(),
            Self::TimeSpan => format_span(&data.start, data.end.as_deref()).into(),
            Self::Title => data.info.title.as_str().into(),
            Self::Place => data.info.place.as_deref().unwrap_or("").into(),
            Self::Participants => data.info.participants.join(", ").into(),
            Self::Status { now } => match has_ended(data, *now) {
                true => "✓".into(),
                false => "·".into(),
            },
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            Self::Id => PaddingDirection::Right,
            _ => PaddingDirection::Left,
        }
    }

    fn get_color(&self, data: &Occurrence) -> Option<Color> {
        match self {
            Self::Status { now } if has_ended(data, *now) => Some(Color::BrightBlack),
            Self::Id if data.is_generated() => Some(Color::Cyan),
            _ => None,
        }
    }
}

fn has_ended(data: &Occurrence, now: Timestamp) -> bool {
    let end = data.end.as_deref().unwrap_or(&data.start);
    parse_timestamp(end).is_ok_and(|end| end < now)
}

/// Columns of a listing of stored events.
#[derive(Debug, Clone, Copy)]
pub enum EventColumn {
    Id,
    FullId,
    Start,
    Recurrence,
    Title,
}

impl EventColumn {
    pub fn columns(verbose: bool) -> Vec<Self> {
        let id = if verbose { Self::FullId } else { Self::Id };
        vec![id, Self::Start, Self::Recurrence, Self::Title]
    }
}

impl TableColumn<Event> for EventColumn {
    fn name(&self) -> Cow<'_, str> {
        match self {
            Self::Id | Self::FullId => "ID",
            Self::Start => "Start",
            Self::Recurrence => "Recurrence",
            Self::Title => "Title",
        }
        .into()
    }

    fn format<'a>(&self, data: &'a Event) -> Cow<'a, str> {
        match self {
            Self::Id => short_id(data.id()).into(),
            Self::FullId => data.id().into(),
            Self::Start => format_datetime(data.start()).into(),
            Self::Recurrence => match data {
                Event::Single(_) => "".into(),
                Event::Recurring(e) => format!("{} ({})", e.rrule, e.tz).into(),
            },
            Self::Title => data.info().title.as_str().into(),
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            Self::Id => PaddingDirection::Right,
            _ => PaddingDirection::Left,
        }
    }

    fn get_color(&self, data: &Event) -> Option<Color> {
        match (self, data) {
            (Self::Recurrence, Event::Recurring(_)) => Some(Color::Cyan),
            _ => None,
        }
    }
}
