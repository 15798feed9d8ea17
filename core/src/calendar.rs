// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use jiff::civil::{Date, Time};
use jiff::{Timestamp, ToSpan, Zoned};
use uuid::Uuid;

use crate::datetime::{OffsetDateTime, ZoneResolver};
use crate::event::RecurringEvent;
use crate::occurrence::{OCCURRENCE_DELIMITER, Occurrence, TimeRange, collect_range};
use crate::store::EventStore;
use crate::{Config, Event, EventDraft, EventPatch, ExpandMode, ExpandRequest, Expander};

/// Shortest identifier prefix accepted for lookups.
pub const MIN_ID_PREFIX_LEN: usize = 4;

/// Wallcal calendar application core.
#[derive(Debug)]
pub struct Calendar {
    now: Zoned,
    config: Config,
    store: EventStore,
    resolver: ZoneResolver,
}

impl Calendar {
    /// Creates a new calendar with the given configuration.
    pub async fn new(mut config: Config) -> Result<Self, Box<dyn Error>> {
        config.normalize()?;

        let resolver = ZoneResolver::new();
        let tz = resolver.time_zone(config.timezone())?;
        let now = Timestamp::now().to_zoned(tz);

        let path = config
            .store_path
            .clone()
            .ok_or("Store path is not configured")?;
        tracing::debug!(path = %path.display(), tz = config.timezone(), "opening calendar");
        Ok(Self {
            now,
            config,
            store: EventStore::new(path),
            resolver,
        })
    }

    /// The current time in the configured timezone.
    pub fn now(&self) -> &Zoned {
        &self.now
    }

    /// Refresh the current time to now.
    pub fn refresh_now(&mut self) {
        self.now = Timestamp::now().to_zoned(self.now.time_zone().clone());
    }

    /// Pin the current time, used by the today and week listings.
    pub fn set_now(&mut self, now: Timestamp) {
        self.now = now.to_zoned(self.now.time_zone().clone());
    }

    /// The configured timezone.
    pub fn timezone(&self) -> &str {
        self.config.timezone()
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The timezone resolver shared by every operation.
    pub fn resolver(&self) -> &ZoneResolver {
        &self.resolver
    }

    /// Add a new event from the given draft.
    pub async fn new_event(&self, mut draft: EventDraft) -> Result<Event, Box<dyn Error>> {
        let mut events = self.store.load().await?;

        if draft.end.is_none() {
            if let Some(duration) = &self.config.default_duration {
                let start = OffsetDateTime::parse(&draft.start)?;
                let end = start.timestamp()?.checked_add(duration.duration())?;
                let end = OffsetDateTime::new(start.offset().to_datetime(end), start.offset());
                draft.end = Some(end.to_string());
            }
        }

        let id = generate_uid(&events)?;
        let event = draft.into_event(id, self.timezone());
        event.validate(&self.resolver)?;

        tracing::debug!(id = event.id(), "adding event");
        events.push(event.clone());
        self.store.save(&events).await?;
        Ok(event)
    }

    /// Update an event with the given patch.
    pub async fn update_event(
        &self,
        id: &str,
        patch: EventPatch,
    ) -> Result<Event, Box<dyn Error>> {
        let mut events = self.store.load().await?;
        let index = find_index(&events, id)?;

        let event = patch.apply_to(events[index].clone(), self.timezone())?;
        event.validate(&self.resolver)?;

        tracing::debug!(id = event.id(), "updating event");
        events[index] = event.clone();
        self.store.save(&events).await?;
        Ok(event)
    }

    /// Delete an event, a recurring series is removed as a whole.
    pub async fn delete_event(&self, id: &str) -> Result<Event, Box<dyn Error>> {
        let mut events = self.store.load().await?;
        let index = find_index(&events, id)?;
        let event = events.remove(index);

        tracing::debug!(id = event.id(), "deleting event");
        self.store.save(&events).await?;
        Ok(event)
    }

    /// Get an event by its identifier or a unique prefix of it.
    pub async fn get_event(&self, id: &str) -> Result<Event, Box<dyn Error>> {
        let mut events = self.store.load().await?;
        let index = find_index(&events, id)?;
        Ok(events.swap_remove(index))
    }

    /// List every stored event in store order.
    pub async fn list_events(&self) -> Result<Vec<Event>, Box<dyn Error>> {
        self.store.load().await
    }

    /// Suppress one occurrence of a series.
    ///
    /// The instant must be given exactly as the series produces it. Skipping an
    /// already skipped occurrence is a no-op.
    pub async fn skip_occurrence(
        &self,
        id: &str,
        instant: &str,
    ) -> Result<RecurringEvent, Box<dyn Error>> {
        OffsetDateTime::parse(instant).map_err(|_| crate::Error::InvalidException(instant.into()))?;

        let mut events = self.store.load().await?;
        let index = find_index(&events, id)?;
        let Event::Recurring(series) = &mut events[index] else {
            return Err(format!("Event {id} is not a recurring series").into());
        };

        if series.exceptions.iter().any(|e| e == instant) {
            return Ok(series.clone());
        }

        let occurrences = Expander::new(&self.resolver).expand(&ExpandRequest {
            anchor: &series.start,
            tz: &series.tz,
            rule: &series.rule()?,
            range_start: instant,
            range_end: instant,
            exceptions: &series.exceptions,
            mode: ExpandMode::WallClock,
        })?;
        if !occurrences.iter().any(|o| o == instant) {
            return Err(format!("Series {} has no occurrence at {instant}", series.id).into());
        }

        series.add_exception(instant)?;
        let series = series.clone();
        tracing::debug!(id = %series.id, instant, "skipping occurrence");
        self.store.save(&events).await?;
        Ok(series)
    }

    /// Expand a series into its occurrence instants within `[from, to]`.
    pub async fn expand(
        &self,
        id: &str,
        from: &str,
        to: &str,
        mode: ExpandMode,
    ) -> Result<Vec<String>, Box<dyn Error>> {
        let events = self.store.load().await?;
        let index = find_index(&events, id)?;
        let Event::Recurring(series) = &events[index] else {
            return Err(format!("Event {id} is not a recurring series").into());
        };

        let occurrences = Expander::new(&self.resolver).expand(&ExpandRequest {
            anchor: &series.start,
            tz: &series.tz,
            rule: &series.rule()?,
            range_start: from,
            range_end: to,
            exceptions: &series.exceptions,
            mode,
        })?;
        Ok(occurrences)
    }

    /// List events and generated occurrences touching `[from, to]`.
    pub async fn list_range(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Vec<Occurrence>, Box<dyn Error>> {
        let range = TimeRange::parse(from, to)?;
        self.collect(&range).await
    }

    /// List events and generated occurrences of the current day.
    pub async fn list_today(&self) -> Result<Vec<Occurrence>, Box<dyn Error>> {
        let today = self.now.date();
        let range = self.civil_range(today, today)?;
        self.collect(&range).await
    }

    /// List events and generated occurrences of the current week, Monday to Sunday.
    pub async fn list_week(&self) -> Result<Vec<Occurrence>, Box<dyn Error>> {
        let today = self.now.date();
        let monday = today.checked_sub(i64::from(today.weekday().to_monday_zero_offset()).days())?;
        let sunday = monday.checked_add(6.days())?;
        let range = self.civil_range(monday, sunday)?;
        self.collect(&range).await
    }

    async fn collect(&self, range: &TimeRange) -> Result<Vec<Occurrence>, Box<dyn Error>> {
        let events = self.store.load().await?;
        Ok(collect_range(&self.resolver, &events, range)?)
    }

    /// From the first second of `first` to the last second of `last`, in the configured timezone.
    fn civil_range(&self, first: Date, last: Date) -> Result<TimeRange, Box<dyn Error>> {
        let tz = self.timezone();
        let start = self.resolver.resolve_civil(first.to_datetime(Time::midnight()), tz)?;
        let end = self
            .resolver
            .resolve_civil(last.to_datetime(Time::constant(23, 59, 59, 0)), tz)?;
        let range = TimeRange::parse(
            &self.resolver.format_in_time_zone(start, tz)?,
            &self.resolver.format_in_time_zone(end, tz)?,
        )?;
        Ok(range)
    }
}

fn generate_uid(events: &[Event]) -> Result<String, Box<dyn Error>> {
    for _ in 0..16 {
        let uid = Uuid::new_v4().to_string();
        if events.iter().any(|e| e.id() == uid) {
            continue;
        }
        return Ok(uid);
    }

    Err("Failed to generate a unique UID after multiple attempts".into())
}

/// Find an event by its full identifier or a unique prefix of it.
fn find_index(events: &[Event], id: &str) -> Result<usize, Box<dyn Error>> {
    if let Some(index) = events.iter().position(|e| e.id() == id) {
        return Ok(index);
    }

    if id.contains(OCCURRENCE_DELIMITER) {
        return Err(format!("{id} is an occurrence, use the series id instead").into());
    }
    if id.len() < MIN_ID_PREFIX_LEN {
        return Err(format!("Event not found: {id}").into());
    }

    let mut matches = events
        .iter()
        .enumerate()
        .filter(|(_, e)| e.id().starts_with(id))
        .map(|(i, _)| i);
    match (matches.next(), matches.next()) {
        (Some(index), None) => Ok(index),
        (Some(_), Some(_)) => Err(format!("Ambiguous id prefix: {id}").into()),
        (None, _) => Err(format!("Event not found: {id}").into()),
    }
}
