// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command};
use wallcal_core::Calendar;

use crate::arg::CommonArgs;
use crate::cmd_event::print_occurrences;
use crate::util::OutputFormat;

#[derive(Debug, Clone, Copy)]
pub struct CmdToday {
    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl Default for CmdToday {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Table,
            verbose: false,
        }
    }
}

impl CmdToday {
    pub const NAME: &str = "today";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("List events and occurrences of today")
            .arg(CommonArgs::output_format())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            output_format: CommonArgs::get_output_format(matches),
            verbose: CommonArgs::get_verbose(matches),
        }
    }

    pub async fn run(self, calendar: &mut Calendar) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing today's events...");
        let occurrences = calendar.list_today().await?;
        print_occurrences(calendar, &occurrences, self.output_format, self.verbose);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CmdWeek {
    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl CmdWeek {
    pub const NAME: &str = "week";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("List events and occurrences of the current week, Monday to Sunday")
            .arg(CommonArgs::output_format())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            output_format: CommonArgs::get_output_format(matches),
            verbose: CommonArgs::get_verbose(matches),
        }
    }

    pub async fn run(self, calendar: &mut Calendar) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing this week's events...");
        let occurrences = calendar.list_week().await?;
        print_occurrences(calendar, &occurrences, self.output_format, self.verbose);
        Ok(())
    }
}
