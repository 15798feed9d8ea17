// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, io, path::PathBuf, process::ExitCode};

use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use futures::{FutureExt, future::BoxFuture};
use tracing_subscriber::EnvFilter;
use wallcal_core::{APP_NAME, Calendar};

use crate::cmd_event::{
    CmdEventDelete, CmdEventEdit, CmdEventExpand, CmdEventList, CmdEventNew, CmdEventSkip,
};
use crate::cmd_generate_completion::CmdGenerateCompletion;
use crate::cmd_toplevel::{CmdToday, CmdWeek};
use crate::config::parse_config;

/// Log level used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Run the wallcal command-line interface.
pub async fn run() -> ExitCode {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let result = match Cli::parse() {
        Ok(cli) => cli.run().await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("A local calendar whose recurring events keep their wall-clock time.")
            .author("Zexin Yuan <aim@yzx9.xyz>")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(false) // allow default to today
            .arg_required_else_help(false)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Falls back to the WALLCAL_CONFIG environment variable, then to \
$XDG_CONFIG_HOME/wallcal/config.toml on Linux and MacOS, %LOCALAPPDATA%/wallcal/config.toml on \
Windows.",
                    )
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .subcommand(CmdToday::command())
            .subcommand(CmdWeek::command())
            .subcommand(
                Command::new("event")
                    .alias("e")
                    .about("Manage your events and recurring series")
                    .arg_required_else_help(true)
                    .subcommand_required(true)
                    .subcommand(CmdEventNew::command())
                    .subcommand(CmdEventEdit::command())
                    .subcommand(CmdEventDelete::command())
                    .subcommand(CmdEventList::command())
                    .subcommand(CmdEventExpand::command())
                    .subcommand(CmdEventSkip::command()),
            )
            .subcommand(CmdGenerateCompletion::command())
    }

    /// Parse the command-line arguments
    pub fn parse() -> Result<Self, Box<dyn Error>> {
        let commands = Self::command();
        let matches = commands.get_matches();
        Self::from(matches)
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Self::from(matches)
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: ArgMatches) -> Result<Self, Box<dyn Error>> {
        use Commands::*;
        let command = match matches.subcommand() {
            Some((CmdToday::NAME, matches)) => Today(CmdToday::from(matches)),
            Some((CmdWeek::NAME, matches)) => Week(CmdWeek::from(matches)),
            Some(("event", matches)) => match matches.subcommand() {
                Some((CmdEventNew::NAME, matches)) => EventNew(CmdEventNew::from(matches)?),
                Some((CmdEventEdit::NAME, matches)) => EventEdit(CmdEventEdit::from(matches)?),
                Some((CmdEventDelete::NAME, matches)) => EventDelete(CmdEventDelete::from(matches)),
                Some((CmdEventList::NAME, matches)) => EventList(CmdEventList::from(matches)?),
                Some((CmdEventExpand::NAME, matches)) => EventExpand(CmdEventExpand::from(matches)),
                Some((CmdEventSkip::NAME, matches)) => EventSkip(CmdEventSkip::from(matches)?),
                _ => unreachable!(),
            },
            Some((CmdGenerateCompletion::NAME, matches)) => {
                GenerateCompletion(CmdGenerateCompletion::from(matches))
            }
            None => Today(CmdToday::default()),
            _ => unreachable!(),
        };

        let config = matches.get_one("config").cloned();
        Ok(Cli { config, command })
    }

    /// Run the command
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config).await
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// List today's events
    Today(CmdToday),

    /// List this week's events
    Week(CmdWeek),

    /// Add a new event or series
    EventNew(CmdEventNew),

    /// Edit an event or series
    EventEdit(CmdEventEdit),

    /// Delete events or series
    EventDelete(CmdEventDelete),

    /// List stored events, or events within a range
    EventList(CmdEventList),

    /// Expand a series into occurrence instants
    EventExpand(CmdEventExpand),

    /// Skip one occurrence of a series
    EventSkip(CmdEventSkip),

    /// Generate shell completion
    GenerateCompletion(CmdGenerateCompletion),
}

impl Commands {
    /// Run the command with the given configuration
    #[rustfmt::skip]
    pub async fn run(self, config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
        use Commands::*;
        match self {
            Today(a)       => Self::run_with(config, |x| a.run(x).boxed()).await,
            Week(a)        => Self::run_with(config, |x| a.run(x).boxed()).await,
            EventNew(a)    => Self::run_with(config, |x| a.run(x).boxed()).await,
            EventEdit(a)   => Self::run_with(config, |x| a.run(x).boxed()).await,
            EventDelete(a) => Self::run_with(config, |x| a.run(x).boxed()).await,
            EventList(a)   => Self::run_with(config, |x| a.run(x).boxed()).await,
            EventExpand(a) => Self::run_with(config, |x| a.run(x).boxed()).await,
            EventSkip(a)   => Self::run_with(config, |x| a.run(x).boxed()).await,
            GenerateCompletion(a) => a.run(),
        }
    }

    async fn run_with<F>(config: Option<PathBuf>, f: F) -> Result<(), Box<dyn Error>>
    where
        F: for<'a> FnOnce(&'a mut Calendar) -> BoxFuture<'a, Result<(), Box<dyn Error>>>,
    {
        tracing::debug!("parsing configuration...");
        let config = parse_config(config).await?;
        let mut calendar = Calendar::new(config).await?;

        f(&mut calendar).await
    }
}
