// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use wallcal_core::OffsetDateTime;

/// The output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

/// Render an instant string as `YYYY-MM-DD HH:MM`, keeping the input untouched if it does not parse.
pub fn format_datetime(s: &str) -> String {
    match OffsetDateTime::parse(s) {
        Ok(dt) => dt.civil().strftime("%Y-%m-%d %H:%M").to_string(),
        Err(_) => s.to_string(),
    }
}

/// Render a start and optional end, collapsing the end date when both fall on the same day.
pub fn format_span(start: &str, end: Option<&str>) -> String {
    let (Ok(start_dt), Some(end)) = (OffsetDateTime::parse(start), end) else {
        return format_datetime(start);
    };
    let Ok(end_dt) = OffsetDateTime::parse(end) else {
        return format!("{}~{}", format_datetime(start), end);
    };

    if start_dt.civil().date() == end_dt.civil().date() {
        format!(
            "{}~{}",
            start_dt.civil().strftime("%Y-%m-%d %H:%M"),
            end_dt.civil().strftime("%H:%M")
        )
    } else {
        format!("{}~{}", format_datetime(start), format_datetime(end))
    }
}

/// The part of an id shown in tables.
pub fn short_id(id: &str) -> &str {
    const SHORT_LEN: usize = 8;
    match id.char_indices().nth(SHORT_LEN) {
        Some((i, _)) => &id[..i],
        None => id,
    }
}
