// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Occurrence generation for recurring series.

use std::collections::HashSet;
use std::fmt::{self, Display};
use std::str::FromStr;

use jiff::{Span, Timestamp};
use jiff::civil::{Date, DateTime, Time};

use crate::Error;
use crate::datetime::{OffsetDateTime, ZoneResolver};
use crate::rrule::{Frequency, RecurrenceRule, WeekdaySet};

/// Upper bound on how many years past its starting point a scan may walk.
const MAX_SCAN_YEARS: i32 = 100;

/// Days kept between a skip-ahead target and the start of the query range.
const SKIP_MARGIN_DAYS: i64 = 2;

/// How wall-clock times of a series are turned into instants.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ExpandMode {
    /// Every occurrence keeps the anchor's wall-clock time in the series timezone.
    #[default]
    WallClock,
}

const MODE_WALL_CLOCK: &str = "wall-clock";

impl AsRef<str> for ExpandMode {
    fn as_ref(&self) -> &str {
        match self {
            ExpandMode::WallClock => MODE_WALL_CLOCK,
        }
    }
}

impl Display for ExpandMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl FromStr for ExpandMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            MODE_WALL_CLOCK => Ok(ExpandMode::WallClock),
            _ => Err(Error::UnsupportedMode(s.to_string())),
        }
    }
}

/// Inputs of a single expansion.
#[derive(Debug, Clone, Copy)]
pub struct ExpandRequest<'a> {
    /// The first occurrence, as an offset-qualified string.
    pub anchor: &'a str,

    /// IANA timezone the series lives in.
    pub tz: &'a str,

    /// The recurrence rule.
    pub rule: &'a RecurrenceRule,

    /// Inclusive lower bound of the query.
    pub range_start: &'a str,

    /// Inclusive upper bound of the query.
    pub range_end: &'a str,

    /// Occurrences to suppress, matched against the formatted occurrence.
    pub exceptions: &'a [String],

    /// Resolution policy.
    pub mode: ExpandMode,
}

/// Generates occurrences of recurring series.
#[derive(Debug, Clone, Copy)]
pub struct Expander<'a> {
    resolver: &'a ZoneResolver,
}

impl<'a> Expander<'a> {
    /// Creates an expander resolving timezones through `resolver`.
    pub fn new(resolver: &'a ZoneResolver) -> Self {
        Self { resolver }
    }

    /// Lists the occurrences of a series within the request's range, in ascending order.
    pub fn expand(&self, req: &ExpandRequest<'_>) -> Result<Vec<String>, Error> {
        let anchor = OffsetDateTime::parse(req.anchor)?;
        let anchor_instant = anchor.timestamp()?;
        let range_start = parse_bound(req.range_start)?;
        let range_end = parse_bound(req.range_end)?;
        let until = match &req.rule.until {
            Some(until) => Some(
                OffsetDateTime::parse(until)
                    .and_then(|a| a.timestamp())
                    .map_err(|_| Error::InvalidUntil(until.clone()))?,
            ),
            None => None,
        };
        let exceptions = req
            .exceptions
            .iter()
            .map(|e| match OffsetDateTime::parse(e) {
                Ok(_) => Ok(e.as_str()),
                Err(_) => Err(Error::InvalidException(e.clone())),
            })
            .collect::<Result<HashSet<_>, _>>()?;

        // The wall-clock template is the anchor as seen in the series timezone,
        // so the anchor instant is always the first candidate.
        let local = self.resolver.zoned_parts(anchor_instant, req.tz)?.civil;
        if local != anchor.civil() {
            tracing::warn!(
                anchor = req.anchor,
                tz = req.tz,
                local = %local,
                "anchor offset disagrees with its timezone"
            );
        }

        let mut walk = Walk {
            resolver: self.resolver,
            tz: req.tz,
            anchor_instant,
            time: local.time(),
            count: req.rule.count,
            until,
            range_start,
            range_end,
            exceptions: &exceptions,
            generated: 0,
            occurrences: Vec::new(),
        };

        if range_end >= range_start {
            let weekdays = req.rule.weekdays(local.weekday());
            let skip_to = self.skip_target(req, range_start)?;
            match req.rule.freq {
                Frequency::Weekly => {
                    walk_weekly(&mut walk, local.date(), req.rule, weekdays, skip_to)?
                }
                Frequency::Monthly => {
                    walk_monthly(&mut walk, local.date(), req.rule, weekdays, skip_to)?
                }
            }
        }

        tracing::debug!(
            anchor = req.anchor,
            rule = %req.rule,
            candidates = walk.generated,
            occurrences = walk.occurrences.len(),
            "expanded series"
        );
        Ok(walk.occurrences)
    }

    /// The civil date scanning may jump to, when nothing before it can matter.
    fn skip_target(
        &self,
        req: &ExpandRequest<'_>,
        range_start: Timestamp,
    ) -> Result<Option<Date>, Error> {
        if req.rule.count.is_some() {
            return Ok(None);
        }

        let local = self.resolver.zoned_parts(range_start, req.tz)?;
        let margin = Span::new().days(SKIP_MARGIN_DAYS);
        Ok(local.civil.date().checked_sub(margin).ok())
    }
}

fn parse_bound(s: &str) -> Result<Timestamp, Error> {
    OffsetDateTime::parse(s)
        .and_then(|a| a.timestamp())
        .map_err(|_| Error::InvalidRange(s.to_string()))
}

/// State shared by the weekly and monthly walks.
struct Walk<'a> {
    resolver: &'a ZoneResolver,
    tz: &'a str,
    anchor_instant: Timestamp,
    time: Time,
    count: Option<u32>,
    until: Option<Timestamp>,
    range_start: Timestamp,
    range_end: Timestamp,
    exceptions: &'a HashSet<&'a str>,
    generated: u32,
    occurrences: Vec<String>,
}

/// Whether the walk should go on after a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

impl Walk<'_> {
    /// Resolves a candidate date, applies the bounds and records it when it survives.
    fn visit(&mut self, date: Date) -> Result<Flow, Error> {
        let civil = DateTime::from_parts(date, self.time);
        let instant = self.resolver.resolve_civil(civil, self.tz)?;
        if instant < self.anchor_instant {
            return Ok(Flow::Continue);
        }
        if self.until.is_some_and(|until| instant > until) {
            return Ok(Flow::Stop);
        }

        self.generated += 1;
        let exhausted = self.count.is_some_and(|count| self.generated >= count);

        if instant > self.range_end {
            return Ok(Flow::Stop);
        }
        if instant >= self.range_start {
            let formatted = self.resolver.format_in_time_zone(instant, self.tz)?;
            if self.exceptions.contains(formatted.as_str()) {
                tracing::debug!(occurrence = formatted, "skipping exception");
            } else {
                self.occurrences.push(formatted);
            }
        }

        Ok(if exhausted { Flow::Stop } else { Flow::Continue })
    }
}

fn walk_weekly(
    walk: &mut Walk<'_>,
    anchor: Date,
    rule: &RecurrenceRule,
    weekdays: WeekdaySet,
    skip_to: Option<Date>,
) -> Result<(), Error> {
    let period = i64::from(rule.interval) * 7;
    let mut date = anchor;
    if let Some(target) = skip_to.filter(|t| *t > anchor) {
        let days = i64::from(anchor.until(target).map_err(date_err)?.get_days());
        let skipped = days / period * period;
        date = anchor
            .checked_add(Span::new().days(skipped))
            .map_err(date_err)?;
    }

    let ceiling = i32::from(date.year()) + MAX_SCAN_YEARS;
    while i32::from(date.year()) <= ceiling {
        let days = i64::from(anchor.until(date).map_err(date_err)?.get_days());
        let weeks = days / 7;
        if weekdays.contains(date.weekday())
            && weeks % i64::from(rule.interval) == 0
            && walk.visit(date)? == Flow::Stop
        {
            return Ok(());
        }

        date = match date.tomorrow() {
            Ok(next) => next,
            Err(_) => break,
        };
    }

    tracing::debug!(%anchor, "weekly scan reached its ceiling");
    Ok(())
}

fn walk_monthly(
    walk: &mut Walk<'_>,
    anchor: Date,
    rule: &RecurrenceRule,
    weekdays: WeekdaySet,
    skip_to: Option<Date>,
) -> Result<(), Error> {
    let interval = i64::from(rule.interval);
    let month_index = |d: Date| i64::from(d.year()) * 12 + i64::from(d.month()) - 1;

    let base = month_index(anchor);
    let mut step = 0;
    if let Some(target) = skip_to {
        let months = month_index(target) - base;
        if months > 0 {
            step = months / interval;
        }
    }

    let ceiling = step + i64::from(MAX_SCAN_YEARS) * 12 / interval + 1;
    while step <= ceiling {
        let index = base + step * interval;
        let Some(first) = first_of_month(index) else {
            break;
        };

        for date in select_days(first, weekdays, rule.by_set_pos) {
            if walk.visit(date)? == Flow::Stop {
                return Ok(());
            }
        }
        step += 1;
    }

    tracing::debug!(%anchor, "monthly scan reached its ceiling");
    Ok(())
}

fn first_of_month(index: i64) -> Option<Date> {
    let year = i16::try_from(index.div_euclid(12)).ok()?;
    let month = i8::try_from(index.rem_euclid(12) + 1).ok()?;
    Date::new(year, month, 1).ok()
}

/// Days of the month starting at `first` whose weekday is in `weekdays`, narrowed
/// to the `by_set_pos`-th one when set.
fn select_days(first: Date, weekdays: WeekdaySet, by_set_pos: Option<i32>) -> Vec<Date> {
    let days: Vec<Date> = (1..=first.days_in_month())
        .filter_map(|day| first.with().day(day).build().ok())
        .filter(|d| weekdays.contains(d.weekday()))
        .collect();

    let Some(pos) = by_set_pos else {
        return days;
    };

    let len = i64::try_from(days.len()).unwrap_or(i64::MAX);
    let pos = i64::from(pos);
    let index = if pos > 0 { pos - 1 } else { len + pos };
    match usize::try_from(index) {
        Ok(i) if index < len => vec![days[i]],
        _ => Vec::new(),
    }
}

fn date_err(e: jiff::Error) -> Error {
    Error::InvalidDateTime(e.to_string())
}
