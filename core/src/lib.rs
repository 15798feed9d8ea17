// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Core of wallcal: a file-backed calendar whose recurring series keep their
//! wall-clock time across daylight-saving transitions.

mod calendar;
mod config;
mod datetime;
mod error;
mod event;
mod expand;
mod occurrence;
mod rrule;
mod store;

pub use crate::calendar::{Calendar, MIN_ID_PREFIX_LEN};
pub use crate::config::{APP_NAME, Config, ConfigDuration};
pub use crate::datetime::{OffsetDateTime, ZoneResolver, ZonedParts, parse_timestamp};
pub use crate::error::{Error, RuleError};
pub use crate::event::{
    Event, EventDraft, EventInfo, EventPatch, RecurrenceDraft, RecurringEvent, SingleEvent,
};
pub use crate::expand::{ExpandMode, ExpandRequest, Expander};
pub use crate::occurrence::{
    OCCURRENCE_DELIMITER, Occurrence, TimeRange, collect_range, materialize,
};
pub use crate::rrule::{Frequency, RecurrenceRule, WeekdaySet};
pub use crate::store::EventStore;
