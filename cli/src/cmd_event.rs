// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use colored::Colorize;
use wallcal_core::{
    Calendar, Event, EventDraft, EventPatch, ExpandMode, OCCURRENCE_DELIMITER, Occurrence,
    RecurrenceDraft,
};

use crate::arg::{CommonArgs, EventArgs, RangeArgs};
use crate::event_formatter::{EventColumn, Formatter, OccurrenceColumn};
use crate::util::OutputFormat;

#[derive(Debug, Clone)]
pub struct CmdEventNew {
    pub title: String,
    pub start: String,
    pub end: Option<String>,
    pub place: Option<String>,
    pub participants: Vec<String>,
    pub rrule: Option<String>,
    pub tz: Option<String>,

    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl CmdEventNew {
    pub const NAME: &str = "new";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("add")
            .about("Add a new event, or a recurring series when a rule is given")
            .arg(EventArgs::title(true))
            .arg(EventArgs::start())
            .arg(EventArgs::end())
            .arg(EventArgs::place())
            .arg(EventArgs::participants())
            .arg(EventArgs::rrule())
            .arg(EventArgs::tz())
            .arg(CommonArgs::output_format())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let title = EventArgs::get_title(matches).ok_or("Title is required for new event")?;
        let start = EventArgs::get_start(matches).ok_or("Start is required for new event")?;
        let rrule = EventArgs::get_rrule(matches);
        let tz = EventArgs::get_tz(matches);
        if tz.is_some() && rrule.is_none() {
            return Err("A timezone only applies to a recurring series, add --rrule".into());
        }

        Ok(Self {
            title,
            start,
            end: EventArgs::get_end(matches),
            place: EventArgs::get_place(matches),
            participants: EventArgs::get_participants(matches).unwrap_or_default(),
            rrule,
            tz,

            output_format: CommonArgs::get_output_format(matches),
            verbose: CommonArgs::get_verbose(matches),
        })
    }

    pub async fn run(self, calendar: &mut Calendar) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "adding new event...");
        let draft = EventDraft {
            title: self.title,
            start: self.start,
            end: self.end,
            place: self.place,
            participants: self.participants,
            recurrence: self.rrule.map(|rrule| RecurrenceDraft { rrule, tz: self.tz }),
        };

        let event = calendar.new_event(draft).await?;
        print_events(&[event], self.output_format, self.verbose);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdEventEdit {
    pub id: String,
    pub patch: EventPatch,

    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl CmdEventEdit {
    pub const NAME: &str = "edit";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Edit an event or a whole series")
            .long_about(
                "Edit an event or a whole series. Pass an empty value to --end or --place to \
remove it, and --rrule on a single event to turn it into a series.",
            )
            .arg(EventArgs::id())
            .arg(EventArgs::title(false))
            .arg(EventArgs::start())
            .arg(EventArgs::end())
            .arg(EventArgs::place())
            .arg(EventArgs::participants())
            .arg(EventArgs::rrule())
            .arg(EventArgs::tz())
            .arg(CommonArgs::output_format())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let patch = EventPatch {
            title: EventArgs::get_title(matches),
            start: EventArgs::get_start(matches),
            end: EventArgs::get_end(matches).map(|a| (!a.is_empty()).then_some(a)),
            place: EventArgs::get_place(matches).map(|a| (!a.is_empty()).then_some(a)),
            participants: EventArgs::get_participants(matches),
            rrule: EventArgs::get_rrule(matches),
            tz: EventArgs::get_tz(matches),
        };
        if patch.is_empty() {
            return Err("Nothing to edit, pass at least one field".into());
        }

        Ok(Self {
            id: EventArgs::get_id(matches),
            patch,

            output_format: CommonArgs::get_output_format(matches),
            verbose: CommonArgs::get_verbose(matches),
        })
    }

    pub async fn run(self, calendar: &mut Calendar) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "editing event...");
        let event = calendar.update_event(&self.id, self.patch).await?;
        print_events(&[event], self.output_format, self.verbose);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdEventDelete {
    pub ids: Vec<String>,
}

impl CmdEventDelete {
    pub const NAME: &str = "delete";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("rm")
            .about("Delete events, a series is deleted with all its occurrences")
            .arg(EventArgs::ids())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            ids: EventArgs::get_ids(matches),
        }
    }

    pub async fn run(self, calendar: &mut Calendar) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "deleting events...");
        for id in &self.ids {
            let event = calendar.delete_event(id).await?;
            println!("Deleted {} {}", event.id().bold(), event.info().title);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdEventList {
    /// Lists occurrences within the range, or stored events when unset.
    pub range: Option<(String, String)>,

    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl CmdEventList {
    pub const NAME: &str = "list";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("ls")
            .about("List stored events, or every occurrence within a range")
            .arg(RangeArgs::from(false))
            .arg(RangeArgs::to(false))
            .arg(CommonArgs::output_format())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            range: RangeArgs::get_range(matches)?,
            output_format: CommonArgs::get_output_format(matches),
            verbose: CommonArgs::get_verbose(matches),
        })
    }

    pub async fn run(self, calendar: &mut Calendar) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing events...");
        match &self.range {
            Some((from, to)) => {
                let occurrences = calendar.list_range(from, to).await?;
                print_occurrences(calendar, &occurrences, self.output_format, self.verbose);
            }
            None => {
                let events = calendar.list_events().await?;
                if events.is_empty() && self.output_format == OutputFormat::Table {
                    println!("{}", "No events found".italic());
                } else {
                    print_events(&events, self.output_format, self.verbose);
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdEventExpand {
    pub id: String,
    pub from: String,
    pub to: String,
    pub mode: ExpandMode,

    pub output_format: OutputFormat,
}

impl CmdEventExpand {
    pub const NAME: &str = "expand";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Print the occurrence instants of a series within a range")
            .arg(EventArgs::id())
            .arg(RangeArgs::from(true))
            .arg(RangeArgs::to(true))
            .arg(RangeArgs::mode())
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        let get = |name: &str| {
            matches
                .get_one::<String>(name)
                .cloned()
                .expect("range bounds are required")
        };
        Self {
            id: EventArgs::get_id(matches),
            from: get("from"),
            to: get("to"),
            mode: RangeArgs::get_mode(matches),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub async fn run(self, calendar: &mut Calendar) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "expanding series...");
        let instants = calendar
            .expand(&self.id, &self.from, &self.to, self.mode)
            .await?;
        match self.output_format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&instants)?),
            OutputFormat::Table => {
                for instant in &instants {
                    println!("{instant}");
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdEventSkip {
    pub id: String,
    pub instant: String,
}

impl CmdEventSkip {
    pub const NAME: &str = "skip";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Skip one occurrence of a series")
            .long_about(
                "Skip one occurrence of a series. Pass the occurrence id as shown by `list -v`, \
or the series id followed by the occurrence instant.",
            )
            .arg(EventArgs::id())
            .arg(arg!(instant: [INSTANT] "The occurrence instant, as YYYY-MM-DDTHH:MM:SS±HH:MM"))
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let id = EventArgs::get_id(matches);
        let instant = matches.get_one::<String>("instant").cloned();
        let (id, instant) = match (id.split_once(OCCURRENCE_DELIMITER), instant) {
            (Some((series, at)), None) => (series.to_string(), at.to_string()),
            (None, Some(instant)) => (id, instant),
            (Some(_), Some(_)) => {
                return Err("Pass either an occurrence id or a series id with an instant".into());
            }
            (None, None) => return Err("The occurrence instant is required".into()),
        };
        Ok(Self { id, instant })
    }

    pub async fn run(self, calendar: &mut Calendar) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "skipping occurrence...");
        let series = calendar.skip_occurrence(&self.id, &self.instant).await?;
        println!(
            "Skipped {} of {}",
            self.instant.bold(),
            series.info.title.bold()
        );
        Ok(())
    }
}

fn print_events(events: &[Event], output_format: OutputFormat, verbose: bool) {
    let formatter = Formatter::new(EventColumn::columns(verbose), output_format);
    print!("{}", formatter.format(events));
}

pub(crate) fn print_occurrences(
    calendar: &Calendar,
    occurrences: &[Occurrence],
    output_format: OutputFormat,
    verbose: bool,
) {
    if occurrences.is_empty() && output_format == OutputFormat::Table {
        println!("{}", "No events found".italic());
        return;
    }

    let now = calendar.now().timestamp();
    let formatter = Formatter::new(OccurrenceColumn::columns(now, verbose), output_format)
        .with_header(verbose);
    print!("{}", formatter.format(occurrences));
}
