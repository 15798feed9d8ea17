// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::datetime::{OffsetDateTime, ZoneResolver, parse_timestamp};
use crate::rrule::RecurrenceRule;
use crate::Error;

/// Fields shared by single events and recurring series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInfo {
    /// The title of the event.
    pub title: String,

    /// Where the event takes place, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,

    /// The people attending.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<String>,
}

/// An event happening exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleEvent {
    /// The unique identifier.
    pub id: String,

    /// The start, as an offset-qualified instant string.
    pub start: String,

    /// The end, as an offset-qualified instant string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    /// Title, place and participants.
    #[serde(flatten)]
    pub info: EventInfo,
}

/// A recurring series anchored at its first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringEvent {
    /// The unique identifier of the series.
    pub id: String,

    /// The anchor: first occurrence and wall-clock template of every occurrence.
    pub start: String,

    /// End of the anchor occurrence; its distance to `start` is the fixed duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    /// The IANA timezone the wall-clock template lives in.
    pub tz: String,

    /// The recurrence rule, e.g. `FREQ=WEEKLY;BYDAY=MO`.
    pub rrule: String,

    /// Suppressed occurrences, in the exact form the expansion produces them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<String>,

    /// Title, place and participants.
    #[serde(flatten)]
    pub info: EventInfo,
}

impl RecurringEvent {
    /// Parses the recurrence rule.
    pub fn rule(&self) -> Result<RecurrenceRule, Error> {
        Ok(self.rrule.parse()?)
    }

    /// The fixed duration of every occurrence, if the series has an end.
    pub fn duration(&self) -> Result<Option<SignedDuration>, Error> {
        match &self.end {
            Some(end) => {
                let start = parse_timestamp(&self.start)?;
                let end = parse_timestamp(end)?;
                Ok(Some(end.duration_since(start)))
            }
            None => Ok(None),
        }
    }

    /// Adds an exception, returns `false` when it was already present.
    pub fn add_exception(&mut self, instant: &str) -> Result<bool, Error> {
        if OffsetDateTime::parse(instant).is_err() {
            return Err(Error::InvalidException(instant.to_string()));
        }
        if self.exceptions.iter().any(|e| e == instant) {
            return Ok(false);
        }
        self.exceptions.push(instant.to_string());
        Ok(true)
    }
}

/// A stored calendar event, either a single instance or a recurring series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Event {
    /// A one-off event.
    Single(SingleEvent),

    /// A recurring series.
    Recurring(RecurringEvent),
}

impl Event {
    /// The unique identifier.
    pub fn id(&self) -> &str {
        match self {
            Event::Single(e) => &e.id,
            Event::Recurring(e) => &e.id,
        }
    }

    /// The start, or the anchor of a series.
    pub fn start(&self) -> &str {
        match self {
            Event::Single(e) => &e.start,
            Event::Recurring(e) => &e.start,
        }
    }

    /// The end, or the end of the anchor occurrence of a series.
    pub fn end(&self) -> Option<&str> {
        match self {
            Event::Single(e) => e.end.as_deref(),
            Event::Recurring(e) => e.end.as_deref(),
        }
    }

    /// Title, place and participants.
    pub fn info(&self) -> &EventInfo {
        match self {
            Event::Single(e) => &e.info,
            Event::Recurring(e) => &e.info,
        }
    }

    /// Checks the validity rules of the event.
    pub fn validate(&self, resolver: &ZoneResolver) -> Result<(), Error> {
        if self.info().title.trim().is_empty() {
            return Err(Error::InvalidEvent("title must not be empty".to_string()));
        }

        let start = parse_timestamp(self.start())?;
        if let Some(end) = self.end() {
            if parse_timestamp(end)? < start {
                return Err(Error::InvalidEvent(format!(
                    "end {end} is before start {}",
                    self.start()
                )));
            }
        }

        if let Event::Recurring(series) = self {
            series.rule()?;
            resolver.time_zone(&series.tz)?;
            for exception in &series.exceptions {
                OffsetDateTime::parse(exception)
                    .map_err(|_| Error::InvalidException(exception.clone()))?;
            }
        }
        Ok(())
    }
}

/// Recurrence settings of a new series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceDraft {
    /// The recurrence rule.
    pub rrule: String,

    /// The IANA timezone, defaults to the configured one.
    pub tz: Option<String>,
}

/// Draft for an event, used for creating new events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    /// The title of the event.
    pub title: String,

    /// The start, as an offset-qualified instant string.
    pub start: String,

    /// The end, as an offset-qualified instant string.
    pub end: Option<String>,

    /// Where the event takes place.
    pub place: Option<String>,

    /// The people attending.
    pub participants: Vec<String>,

    /// Makes the event a recurring series when set.
    pub recurrence: Option<RecurrenceDraft>,
}

impl EventDraft {
    /// Creates a draft with only the required fields.
    pub fn new(title: impl Into<String>, start: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            start: start.into(),
            end: None,
            place: None,
            participants: Vec::new(),
            recurrence: None,
        }
    }

    /// Converts the draft into an event with the given identifier.
    pub(crate) fn into_event(self, id: String, default_tz: &str) -> Event {
        let info = EventInfo {
            title: self.title,
            place: self.place,
            participants: self.participants,
        };
        match self.recurrence {
            Some(recurrence) => Event::Recurring(RecurringEvent {
                id,
                start: self.start,
                end: self.end,
                tz: recurrence.tz.unwrap_or_else(|| default_tz.to_string()),
                rrule: recurrence.rrule,
                exceptions: Vec::new(),
                info,
            }),
            None => Event::Single(SingleEvent {
                id,
                start: self.start,
                end: self.end,
                info,
            }),
        }
    }
}

/// Patch for an event, allowing partial updates.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EventPatch {
    /// The title of the event, if changed.
    pub title: Option<String>,

    /// The start, if changed.
    pub start: Option<String>,

    /// The end, `Some(None)` removes it.
    pub end: Option<Option<String>>,

    /// The place, `Some(None)` removes it.
    pub place: Option<Option<String>>,

    /// The participants, replacing the current list.
    pub participants: Option<Vec<String>>,

    /// The recurrence rule; setting it on a single event turns it into a series.
    pub rrule: Option<String>,

    /// The timezone of a series.
    pub tz: Option<String>,
}

impl EventPatch {
    /// Is this patch empty, meaning no fields are set
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.place.is_none()
            && self.participants.is_none()
            && self.rrule.is_none()
            && self.tz.is_none()
    }

    /// Applies the patch, producing the updated event.
    pub(crate) fn apply_to(self, event: Event, default_tz: &str) -> Result<Event, Error> {
        let mut event = match (event, self.rrule) {
            (Event::Single(e), Some(rrule)) => Event::Recurring(RecurringEvent {
                id: e.id,
                start: e.start,
                end: e.end,
                tz: default_tz.to_string(),
                rrule,
                exceptions: Vec::new(),
                info: e.info,
            }),
            (Event::Recurring(mut e), Some(rrule)) => {
                e.rrule = rrule;
                Event::Recurring(e)
            }
            (Event::Single(_), None) if self.tz.is_some() => {
                return Err(Error::InvalidEvent(
                    "a timezone only applies to recurring events".to_string(),
                ));
            }
            (event, None) => event,
        };

        let (start, end, info) = match &mut event {
            Event::Single(e) => (&mut e.start, &mut e.end, &mut e.info),
            Event::Recurring(e) => {
                if let Some(tz) = self.tz {
                    e.tz = tz;
                }
                (&mut e.start, &mut e.end, &mut e.info)
            }
        };

        if let Some(v) = self.start {
            *start = v;
        }
        if let Some(v) = self.end {
            *end = v;
        }
        if let Some(v) = self.title {
            info.title = v;
        }
        if let Some(v) = self.place {
            info.place = v;
        }
        if let Some(v) = self.participants {
            info.participants = v;
        }
        Ok(event)
    }
}
