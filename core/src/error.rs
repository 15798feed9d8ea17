// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

/// Errors raised by the recurrence engine.
///
/// All of them are deterministic input-validation failures local to a single call.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The recurrence rule could not be parsed.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// A query range bound is not an offset-qualified instant.
    #[error("Invalid range bound: {0}")]
    InvalidRange(String),

    /// The UNTIL bound of a rule is not an offset-qualified instant.
    #[error("Invalid UNTIL value: {0}")]
    InvalidUntil(String),

    /// An exception entry is not an offset-qualified instant.
    #[error("Invalid exception entry: {0}")]
    InvalidException(String),

    /// A date-time string does not follow `YYYY-MM-DDTHH:MM:SS±HH:MM`.
    #[error("Invalid date-time '{0}', expected YYYY-MM-DDTHH:MM:SS±HH:MM")]
    InvalidDateTime(String),

    /// The timezone identifier is not known to the timezone database.
    #[error("Unknown timezone: {0}")]
    UnknownTimeZone(String),

    /// No instant exists for the civil date-time, even after gap shifting.
    #[error("Invalid local date-time {civil} for timezone {tz}")]
    UnresolvableTime {
        /// The civil date-time that failed to resolve.
        civil: String,
        /// The timezone it was resolved in.
        tz: String,
    },

    /// An event record breaks one of its validity rules.
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// The requested expansion mode is not supported.
    #[error("Unsupported expansion mode: {0}")]
    UnsupportedMode(String),
}

/// Errors raised while parsing a recurrence rule.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// Empty input, a pair without `=`, or a repeated key.
    #[error("Invalid rule: {0}")]
    Syntax(String),

    /// A key outside FREQ, INTERVAL, BYDAY, BYSETPOS, COUNT and UNTIL.
    #[error("Invalid rule: unsupported key '{0}'")]
    UnknownKey(String),

    /// FREQ is missing or not one of WEEKLY and MONTHLY.
    #[error("Unsupported or invalid frequency: {0}")]
    Frequency(String),

    /// INTERVAL is not a positive integer.
    #[error("Invalid INTERVAL: {0}")]
    Interval(String),

    /// BYDAY contains an unknown weekday code.
    #[error("Invalid BYDAY: {0}")]
    ByDay(String),

    /// BYSETPOS is zero or not an integer.
    #[error("Invalid BYSETPOS: {0}")]
    BySetPos(String),

    /// COUNT is not a positive integer.
    #[error("Invalid COUNT: {0}")]
    Count(String),
}
