// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use clap::{Arg, ArgAction, ArgMatches, arg, value_parser};
use wallcal_core::ExpandMode;

use crate::util::OutputFormat;

#[derive(Debug, Clone, Copy)]
pub struct CommonArgs;

impl CommonArgs {
    pub fn verbose() -> Arg {
        arg!(-v --verbose "Show more detailed information")
    }

    pub fn get_verbose(matches: &ArgMatches) -> bool {
        matches.get_flag("verbose")
    }

    pub fn output_format() -> Arg {
        arg!(--"output-format" <FORMAT> "Output format")
            .value_parser(value_parser!(OutputFormat))
            .default_value("table")
    }

    pub fn get_output_format(matches: &ArgMatches) -> OutputFormat {
        matches
            .get_one("output-format")
            .copied()
            .unwrap_or(OutputFormat::Table)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EventArgs;

impl EventArgs {
    pub fn id() -> Arg {
        arg!(id: <ID> "The id of the event, or a unique prefix of at least 4 characters")
    }

    pub fn get_id(matches: &ArgMatches) -> String {
        matches
            .get_one::<String>("id")
            .expect("id is required")
            .clone()
    }

    pub fn ids() -> Arg {
        Self::id().num_args(1..)
    }

    pub fn get_ids(matches: &ArgMatches) -> Vec<String> {
        matches
            .get_many::<String>("id")
            .expect("id is required")
            .cloned()
            .collect()
    }

    pub fn title(positional: bool) -> Arg {
        if positional {
            arg!(title: <TITLE> "Title of the event")
        } else {
            arg!(title: -t --title <TITLE> "Title of the event")
        }
    }

    pub fn get_title(matches: &ArgMatches) -> Option<String> {
        matches.get_one("title").cloned()
    }

    pub fn start() -> Arg {
        arg!(--start <START> "Start, as YYYY-MM-DDTHH:MM:SS±HH:MM")
    }

    pub fn get_start(matches: &ArgMatches) -> Option<String> {
        matches.get_one("start").cloned()
    }

    pub fn end() -> Arg {
        arg!(--end <END> "End, as YYYY-MM-DDTHH:MM:SS±HH:MM")
    }

    pub fn get_end(matches: &ArgMatches) -> Option<String> {
        matches.get_one("end").cloned()
    }

    pub fn place() -> Arg {
        arg!(--place <PLACE> "Where the event takes place")
    }

    pub fn get_place(matches: &ArgMatches) -> Option<String> {
        matches.get_one("place").cloned()
    }

    pub fn participants() -> Arg {
        arg!(-p --participant <NAME> "A participant, repeat for more").action(ArgAction::Append)
    }

    pub fn get_participants(matches: &ArgMatches) -> Option<Vec<String>> {
        matches.get_many::<String>("participant").map(|values| {
            values
                .filter(|a| !a.is_empty())
                .cloned()
                .collect::<Vec<_>>()
        })
    }

    pub fn rrule() -> Arg {
        arg!(--rrule <RULE> "Recurrence rule, e.g. FREQ=WEEKLY;BYDAY=MO,WE")
    }

    pub fn get_rrule(matches: &ArgMatches) -> Option<String> {
        matches.get_one("rrule").cloned()
    }

    pub fn tz() -> Arg {
        arg!(--tz <TIMEZONE> "IANA timezone of a recurring series")
    }

    pub fn get_tz(matches: &ArgMatches) -> Option<String> {
        matches.get_one("tz").cloned()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RangeArgs;

impl RangeArgs {
    pub fn from(required: bool) -> Arg {
        arg!(--from <FROM> "Start of the range, inclusive").required(required)
    }

    pub fn to(required: bool) -> Arg {
        arg!(--to <TO> "End of the range, inclusive").required(required)
    }

    /// Both bounds, or `None` when neither is given.
    pub fn get_range(matches: &ArgMatches) -> Result<Option<(String, String)>, String> {
        let from = matches.get_one::<String>("from").cloned();
        let to = matches.get_one::<String>("to").cloned();
        match (from, to) {
            (Some(from), Some(to)) => Ok(Some((from, to))),
            (None, None) => Ok(None),
            _ => Err("Both --from and --to are required for a range".to_string()),
        }
    }

    pub fn mode() -> Arg {
        arg!(--mode <MODE> "How wall-clock times are resolved")
            .value_parser(value_parser!(ExpandMode))
            .default_value("wall-clock")
    }

    pub fn get_mode(matches: &ArgMatches) -> ExpandMode {
        matches.get_one("mode").copied().unwrap_or_default()
    }
}
