// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrence rules restricted to weekly and monthly frequencies.

use std::fmt::{self, Display};
use std::str::FromStr;

use jiff::civil::Weekday;

use crate::RuleError;

const KEY_FREQ: &str = "FREQ";
const KEY_INTERVAL: &str = "INTERVAL";
const KEY_BYDAY: &str = "BYDAY";
const KEY_BYSETPOS: &str = "BYSETPOS";
const KEY_COUNT: &str = "COUNT";
const KEY_UNTIL: &str = "UNTIL";

const FREQ_WEEKLY: &str = "WEEKLY";
const FREQ_MONTHLY: &str = "MONTHLY";

/// Codes in Sunday-first order, matching `Weekday::to_sunday_zero_offset`.
const DAY_CODES: [&str; 7] = ["SU", "MO", "TU", "WE", "TH", "FR", "SA"];

/// Recurrence frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    /// Once every `interval` weeks.
    Weekly,

    /// Once every `interval` months.
    Monthly,
}

impl AsRef<str> for Frequency {
    fn as_ref(&self) -> &str {
        match self {
            Frequency::Weekly => FREQ_WEEKLY,
            Frequency::Monthly => FREQ_MONTHLY,
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl FromStr for Frequency {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            FREQ_WEEKLY => Ok(Frequency::Weekly),
            FREQ_MONTHLY => Ok(Frequency::Monthly),
            _ => Err(RuleError::Frequency(s.to_string())),
        }
    }
}

/// A set of weekdays.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// A set holding a single weekday.
    pub fn single(day: Weekday) -> Self {
        Self::empty().with(day)
    }

    /// Returns the set with `day` added.
    #[must_use]
    pub fn with(self, day: Weekday) -> Self {
        Self(self.0 | bit(day))
    }

    /// Whether `day` is in the set.
    pub fn contains(self, day: Weekday) -> bool {
        self.0 & bit(day) != 0
    }

    /// Whether the set is empty.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The weekdays in the set, Sunday first.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        (0..7i8)
            .filter(move |i| self.0 & (1 << i) != 0)
            .filter_map(|i| Weekday::from_sunday_zero_offset(i).ok())
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.iter().map(day_code).collect();
        write!(f, "{}", codes.join(","))
    }
}

fn bit(day: Weekday) -> u8 {
    1 << day.to_sunday_zero_offset()
}

fn day_code(day: Weekday) -> &'static str {
    DAY_CODES[day.to_sunday_zero_offset() as usize]
}

fn parse_day_code(code: &str) -> Option<Weekday> {
    let i = DAY_CODES.iter().position(|c| *c == code)?;
    Weekday::from_sunday_zero_offset(i8::try_from(i).ok()?).ok()
}

/// A parsed recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// Frequency of recurrence
    pub freq: Frequency,

    /// Number of periods between two recurrences, at least 1
    pub interval: u32,

    /// Weekdays to recur on; `None` means the anchor's weekday
    pub by_day: Option<WeekdaySet>,

    /// 1-based position within each month, negative counts from the end
    pub by_set_pos: Option<i32>,

    /// Maximum number of generated occurrences
    pub count: Option<u32>,

    /// Inclusive upper bound, an offset-qualified instant string validated on expansion
    pub until: Option<String>,
}

impl RecurrenceRule {
    /// The weekday set in effect for a series anchored on `anchor`.
    pub fn weekdays(&self, anchor: Weekday) -> WeekdaySet {
        self.by_day.unwrap_or_else(|| WeekdaySet::single(anchor))
    }
}

impl FromStr for RecurrenceRule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(RuleError::Syntax("empty rule".to_string()));
        }

        let mut freq = None;
        let mut interval = None;
        let mut by_day = None;
        let mut by_set_pos = None;
        let mut count = None;
        let mut until = None;

        for pair in s.split(';') {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| RuleError::Syntax(format!("malformed pair '{pair}'")))?;

            let duplicated = match key {
                KEY_FREQ => freq.replace(value).is_some(),
                KEY_INTERVAL => interval.replace(parse_interval(value)?).is_some(),
                KEY_BYDAY => by_day.replace(parse_by_day(value)?).is_some(),
                KEY_BYSETPOS => by_set_pos.replace(parse_by_set_pos(value)?).is_some(),
                KEY_COUNT => count.replace(parse_count(value)?).is_some(),
                KEY_UNTIL => until.replace(value.to_string()).is_some(),
                _ => return Err(RuleError::UnknownKey(key.to_string())),
            };
            if duplicated {
                return Err(RuleError::Syntax(format!("duplicated key '{key}'")));
            }
        }

        let freq = freq
            .ok_or_else(|| RuleError::Frequency("missing FREQ".to_string()))?
            .parse()?;

        Ok(Self {
            freq,
            interval: interval.unwrap_or(1),
            by_day,
            by_set_pos,
            count,
            until,
        })
    }
}

impl Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{KEY_FREQ}={};{KEY_INTERVAL}={}", self.freq, self.interval)?;
        if let Some(by_day) = self.by_day {
            write!(f, ";{KEY_BYDAY}={by_day}")?;
        }
        if let Some(pos) = self.by_set_pos {
            write!(f, ";{KEY_BYSETPOS}={pos}")?;
        }
        if let Some(count) = self.count {
            write!(f, ";{KEY_COUNT}={count}")?;
        }
        if let Some(until) = &self.until {
            write!(f, ";{KEY_UNTIL}={until}")?;
        }
        Ok(())
    }
}

fn parse_interval(value: &str) -> Result<u32, RuleError> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(RuleError::Interval(value.to_string())),
    }
}

fn parse_count(value: &str) -> Result<u32, RuleError> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(RuleError::Count(value.to_string())),
    }
}

fn parse_by_set_pos(value: &str) -> Result<i32, RuleError> {
    match value.parse::<i32>() {
        Ok(n) if n != 0 => Ok(n),
        _ => Err(RuleError::BySetPos(value.to_string())),
    }
}

fn parse_by_day(value: &str) -> Result<WeekdaySet, RuleError> {
    value
        .split(',')
        .map(|code| parse_day_code(code).ok_or_else(|| RuleError::ByDay(code.to_string())))
        .collect()
}
