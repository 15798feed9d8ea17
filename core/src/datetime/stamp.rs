// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, str::FromStr, sync::OnceLock};

use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::tz::Offset;
use regex::Regex;

use crate::Error;

/// A civil date-time qualified by an explicit UTC offset, i.e. exactly one instant.
///
/// The textual form is always `YYYY-MM-DDTHH:MM:SS±HH:MM`. A bare `Z` is never
/// accepted nor produced, `+00:00` is used instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetDateTime {
    civil: DateTime,
    offset: Offset,
}

impl OffsetDateTime {
    /// Creates a new value from its civil part and offset.
    pub fn new(civil: DateTime, offset: Offset) -> Self {
        Self { civil, offset }
    }

    /// Parses a strict `YYYY-MM-DDTHH:MM:SS±HH:MM` string.
    pub fn parse(s: &str) -> Result<Self, Error> {
        const RE: &str = r"^(\d{4})-(\d{2})-(\d{2})T(\d{2}):(\d{2}):(\d{2})([+-])(\d{2}):(\d{2})$";
        static REGEX: OnceLock<Regex> = OnceLock::new();
        let re = REGEX.get_or_init(|| Regex::new(RE).expect("valid offset date-time regex"));

        let invalid = || Error::InvalidDateTime(s.to_string());
        let captures = re.captures(s).ok_or_else(invalid)?;
        let field = |i: usize| captures[i].parse::<i16>().map_err(|_| invalid());

        let civil = DateTime::new(
            field(1)?,
            i8::try_from(field(2)?).map_err(|_| invalid())?,
            i8::try_from(field(3)?).map_err(|_| invalid())?,
            i8::try_from(field(4)?).map_err(|_| invalid())?,
            i8::try_from(field(5)?).map_err(|_| invalid())?,
            i8::try_from(field(6)?).map_err(|_| invalid())?,
            0,
        )
        .map_err(|_| invalid())?;

        let (hours, minutes) = (i32::from(field(8)?), i32::from(field(9)?));
        if hours > 23 || minutes > 59 {
            return Err(invalid());
        }
        let sign = if &captures[7] == "-" { -1 } else { 1 };
        let offset = Offset::from_seconds(sign * (hours * 3600 + minutes * 60))
            .map_err(|_| invalid())?;

        Ok(Self { civil, offset })
    }

    /// The wall-clock part.
    pub fn civil(&self) -> DateTime {
        self.civil
    }

    /// The explicit UTC offset.
    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// The absolute instant denoted by this value.
    pub fn timestamp(&self) -> Result<Timestamp, Error> {
        self.offset
            .to_timestamp(self.civil)
            .map_err(|_| Error::InvalidDateTime(self.to_string()))
    }
}

impl FromStr for OffsetDateTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for OffsetDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.civil;
        let seconds = self.offset.seconds();
        let sign = if seconds < 0 { '-' } else { '+' };
        let minutes = seconds.abs() / 60;
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}{}{:02}:{:02}",
            c.year(),
            c.month(),
            c.day(),
            c.hour(),
            c.minute(),
            c.second(),
            sign,
            minutes / 60,
            minutes % 60,
        )
    }
}

/// Parses an offset-qualified string straight into its instant.
pub fn parse_timestamp(s: &str) -> Result<Timestamp, Error> {
    OffsetDateTime::parse(s)?.timestamp()
}
