// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use jiff::SignedDuration;
use serde::de;

/// The name of the wallcal application.
pub const APP_NAME: &str = "wallcal";

/// File name of the event store inside the data directory.
const STORE_FILE_NAME: &str = "events.json";

/// Timezone used when neither the configuration nor the host provides one.
const FALLBACK_TIMEZONE: &str = "UTC";

/// Configuration for the wallcal application.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Config {
    /// Path to the JSON event store.
    #[serde(default)]
    pub store_path: Option<PathBuf>,

    /// IANA timezone used for new series and the today/week shortcuts.
    #[serde(default)]
    pub timezone: Option<String>,

    /// Duration given to new events created without an end.
    #[serde(default)]
    pub default_duration: Option<ConfigDuration>,
}

impl Config {
    /// Normalize the configuration.
    pub fn normalize(&mut self) -> Result<(), Box<dyn Error>> {
        // Normalize store path
        self.store_path = Some(match &self.store_path {
            Some(a) => {
                expand_path(a).map_err(|e| format!("Failed to expand store path: {e}"))?
            }
            None => get_data_dir()?.join(APP_NAME).join(STORE_FILE_NAME),
        });

        // Normalize timezone
        if self.timezone.is_none() {
            let tz = match iana_time_zone::get_timezone() {
                Ok(tz) => tz,
                Err(e) => {
                    tracing::warn!(err = %e, "failed to detect host timezone, using {FALLBACK_TIMEZONE}");
                    FALLBACK_TIMEZONE.to_string()
                }
            };
            self.timezone = Some(tz);
        }

        Ok(())
    }

    /// The configured timezone, `UTC` before normalization.
    pub fn timezone(&self) -> &str {
        self.timezone.as_deref().unwrap_or(FALLBACK_TIMEZONE)
    }
}

/// A duration read from a configuration string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigDuration(SignedDuration);

impl ConfigDuration {
    /// The parsed duration.
    pub fn duration(&self) -> SignedDuration {
        self.0
    }
}

impl<'de> serde::Deserialize<'de> for ConfigDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct DurationVisitor;

        impl<'de> de::Visitor<'de> for DurationVisitor {
            type Value = ConfigDuration;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter
                    .write_str(r#"a duration string like "HH:MM", "1d", "2h", "30m", or "90s""#)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                parse_duration(value)
                    .map(ConfigDuration)
                    .map_err(|e| de::Error::custom(e.to_string()))
            }
        }

        deserializer.deserialize_str(DurationVisitor)
    }
}

/// Handle tilde (~) and environment variables in the path
fn expand_path(path: &Path) -> Result<PathBuf, Box<dyn Error>> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }

    let path = path.to_str().ok_or("Invalid path")?;

    // Handle tilde and home directory
    let home_prefixes: &[&str] = if cfg!(unix) {
        &["~/", "$HOME/", "${HOME}/"]
    } else {
        &[r"~\", "~/", r"%UserProfile%\", r"%UserProfile%/"]
    };
    for prefix in home_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_home_dir()?.join(stripped));
        }
    }

    // Handle data directories
    let data_prefixes: &[&str] = if cfg!(unix) {
        &["$XDG_DATA_HOME/", "${XDG_DATA_HOME}/"]
    } else {
        &[r"%LOCALAPPDATA%\", "%LOCALAPPDATA%/"]
    };
    for prefix in data_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_data_dir()?.join(stripped));
        }
    }

    Ok(path.into())
}

fn get_home_dir() -> Result<PathBuf, Box<dyn Error>> {
    dirs::home_dir().ok_or("User-specific home directory not found".into())
}

fn get_data_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let data_dir = xdg::BaseDirectories::new().get_data_home();
    #[cfg(windows)]
    let data_dir = dirs::data_local_dir();
    data_dir.ok_or("User-specific data directory not found".into())
}

/// Parse a duration string in the format "HH:MM" / "1d" / "2h" / "30m" / "90s".
fn parse_duration(s: &str) -> Result<SignedDuration, Box<dyn Error>> {
    let s = s.trim();
    let (value, unit): (i64, i64) = if let Some((h, m)) = s.split_once(':') {
        let hours: i64 = h.trim().parse()?;
        let minutes: i64 = m.trim().parse()?;
        if !(0..60).contains(&minutes) {
            return Err(format!("Invalid minutes in duration: {s}").into());
        }
        let total = hours
            .checked_mul(60)
            .and_then(|a| a.checked_add(minutes))
            .ok_or_else(|| format!("Duration out of range: {s}"))?;
        (total, 60)
    } else if let Some(rest) = s.strip_suffix('d') {
        (rest.trim().parse()?, 24 * 60 * 60)
    } else if let Some(rest) = s.strip_suffix('h') {
        (rest.trim().parse()?, 60 * 60)
    } else if let Some(rest) = s.strip_suffix('m') {
        (rest.trim().parse()?, 60)
    } else if let Some(rest) = s.strip_suffix('s') {
        (rest.trim().parse()?, 1)
    } else {
        return Err(format!("Invalid duration format: {s}").into());
    };

    let secs = value
        .checked_mul(unit)
        .ok_or_else(|| format!("Duration out of range: {s}"))?;
    let duration = SignedDuration::from_secs(secs);
    if duration.is_negative() {
        return Err(format!("Duration must not be negative: {s}").into());
    }
    Ok(duration)
}
