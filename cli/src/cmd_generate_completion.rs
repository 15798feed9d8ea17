// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io};

use clap::{ArgMatches, Command, ValueEnum, arg, value_parser};
use clap_complete::generate;
use clap_complete_nushell::Nushell;

use crate::Cli;

#[derive(Debug, Clone, Copy)]
pub struct CmdGenerateCompletion {
    pub shell: Shell,
}

impl CmdGenerateCompletion {
    pub const NAME: &str = "generate-completion";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Print a completion script for wallcal")
            .long_about(
                "Print a completion script for wallcal, covering every command, flag and \
enumerated value such as --mode and --output-format.",
            )
            .hide(true)
            .arg(arg!(shell: <SHELL> "Target shell").value_parser(value_parser!(Shell)))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            shell: matches
                .get_one::<Shell>("shell")
                .copied()
                .expect("shell is required"),
        }
    }

    pub fn run(self) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "generating shell completion...");
        self.write_to(&mut io::stdout());
        Ok(())
    }

    /// Writes the completion script of the full `wallcal` command tree.
    pub fn write_to(self, buf: &mut impl io::Write) {
        let mut cmd = Cli::command();
        let bin = cmd.get_name().to_string();
        match self.shell.builtin() {
            Some(shell) => generate(shell, &mut cmd, bin, buf),
            None => generate(Nushell, &mut cmd, bin, buf),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Elvish,
    Fish,
    Nushell,
    #[clap(name = "powershell")]
    #[allow(clippy::enum_variant_names)]
    PowerShell,
    Zsh,
}

impl Shell {
    /// The generator shipped with clap_complete, `None` for nushell.
    fn builtin(self) -> Option<clap_complete::Shell> {
        use clap_complete::Shell as Builtin;
        match self {
            Shell::Bash => Some(Builtin::Bash),
            Shell::Elvish => Some(Builtin::Elvish),
            Shell::Fish => Some(Builtin::Fish),
            Shell::PowerShell => Some(Builtin::PowerShell),
            Shell::Zsh => Some(Builtin::Zsh),
            Shell::Nushell => None,
        }
    }
}
