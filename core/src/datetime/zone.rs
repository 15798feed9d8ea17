// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use jiff::civil::DateTime;
use jiff::tz::{Offset, TimeZone};
use jiff::{SignedDuration, Timestamp, ToSpan};

use crate::Error;
use crate::datetime::OffsetDateTime;

/// How far a nonexistent local time is shifted forward, in minutes, before giving up.
const GAP_SEARCH_MINUTES: i64 = 180;

/// Distance of the outer probes from the naive instant.
const PROBE_DISTANCE: SignedDuration = SignedDuration::from_secs(86_400);

/// The civil date-time and UTC offset observed for an instant in a timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonedParts {
    /// The wall-clock reading.
    pub civil: DateTime,

    /// The UTC offset in effect.
    pub offset: Offset,
}

impl ZonedParts {
    /// The UTC offset in whole minutes.
    pub fn offset_minutes(&self) -> i32 {
        self.offset.seconds() / 60
    }
}

impl From<ZonedParts> for OffsetDateTime {
    fn from(parts: ZonedParts) -> Self {
        OffsetDateTime::new(parts.civil, parts.offset)
    }
}

/// Resolves instants and wall-clock times against IANA timezones.
///
/// Timezone lookups are memoized per identifier on first use. Entries are never
/// replaced once inserted, so the cache only ever takes a write lock on a miss.
#[derive(Debug, Default)]
pub struct ZoneResolver {
    cache: RwLock<HashMap<String, TimeZone>>,
}

impl ZoneResolver {
    /// Creates a resolver with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a timezone by its IANA identifier.
    pub fn time_zone(&self, tz: &str) -> Result<TimeZone, Error> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(zone) = cache.get(tz) {
                return Ok(zone.clone());
            }
        }

        let zone = TimeZone::get(tz).map_err(|_| Error::UnknownTimeZone(tz.to_string()))?;
        tracing::debug!(tz, "caching timezone");
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(cache.entry(tz.to_string()).or_insert(zone).clone())
    }

    /// Decomposes an instant into the civil date-time and offset observed in `tz`.
    pub fn zoned_parts(&self, instant: Timestamp, tz: &str) -> Result<ZonedParts, Error> {
        let zone = self.time_zone(tz)?;
        Ok(parts_of(&zone, instant))
    }

    /// Renders an instant as `YYYY-MM-DDTHH:MM:SS±HH:MM` in `tz`.
    pub fn format_in_time_zone(&self, instant: Timestamp, tz: &str) -> Result<String, Error> {
        let parts = self.zoned_parts(instant, tz)?;
        Ok(OffsetDateTime::from(parts).to_string())
    }

    /// Resolves a wall-clock time in `tz` into an absolute instant.
    ///
    /// When the wall-clock time occurs twice (fold), the later instant wins. When it
    /// never occurs (gap), the time is pushed forward minute by minute, preferring the
    /// first shift that keeps the original minute and second.
    pub fn resolve_civil(&self, civil: DateTime, tz: &str) -> Result<Timestamp, Error> {
        let zone = self.time_zone(tz)?;
        if let Some(instant) = resolve_exact(&zone, civil)? {
            return Ok(instant);
        }

        tracing::debug!(%civil, tz, "local time falls into a gap, shifting forward");
        let mut first_found = None;
        for minutes in 1..=GAP_SEARCH_MINUTES {
            let Ok(shifted) = civil.checked_add(minutes.minutes()) else {
                break;
            };
            let Some(instant) = resolve_exact(&zone, shifted)? else {
                continue;
            };
            if shifted.minute() == civil.minute() && shifted.second() == civil.second() {
                return Ok(instant);
            }
            first_found.get_or_insert(instant);
        }

        first_found.ok_or_else(|| Error::UnresolvableTime {
            civil: civil.to_string(),
            tz: tz.to_string(),
        })
    }
}

fn parts_of(zone: &TimeZone, instant: Timestamp) -> ZonedParts {
    ZonedParts {
        civil: zone.to_datetime(instant),
        offset: zone.to_offset(instant),
    }
}

/// Probe the offsets in effect around `civil` and keep the candidates that map back
/// onto it exactly. Returns the latest such instant, or `None` inside a gap.
fn resolve_exact(zone: &TimeZone, civil: DateTime) -> Result<Option<Timestamp>, Error> {
    let unresolvable = || Error::UnresolvableTime {
        civil: civil.to_string(),
        tz: zone.iana_name().unwrap_or("<unnamed>").to_string(),
    };

    let naive = Offset::UTC.to_timestamp(civil).map_err(|_| unresolvable())?;
    let mut offsets: Vec<Offset> = Vec::with_capacity(3);
    for probe in [
        Some(naive),
        naive.checked_sub(PROBE_DISTANCE).ok(),
        naive.checked_add(PROBE_DISTANCE).ok(),
    ]
    .into_iter()
    .flatten()
    {
        let offset = zone.to_offset(probe);
        if !offsets.contains(&offset) {
            offsets.push(offset);
        }
    }

    let latest = offsets
        .into_iter()
        .filter_map(|offset| offset.to_timestamp(civil).ok())
        .filter(|candidate| parts_of(zone, *candidate).civil == civil)
        .max();
    Ok(latest)
}
