// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use recal_core::{APP_NAME, Config};
use tracing_subscriber::EnvFilter;

use crate::arg::CommonArgs;
use crate::cmd_fmt::CmdFmt;
use crate::cmd_occurrences::CmdOccurrences;
use crate::cmd_revise::CmdRevise;
use crate::cmd_validate::CmdValidate;

/// Environment variable holding the log filter, e.g. `RECAL_LOG=recal_core=trace`.
pub const LOG_ENV: &str = "RECAL_LOG";

/// Run the command-line interface
pub async fn run() -> ExitCode {
    let cli = match Cli::parse() {
        Ok(cli) => cli,
        Err(e) => {
            println!("{} {}", "Error:".red(), e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(cli.verbose);
    match cli.run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            println!("{} {}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// Log at debug level
    pub verbose: bool,

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
            .about("Parse, expand and revise iCalendar files.")
            .author("Zexin Yuan <aim@yzx9.xyz>")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Defaults to $RECAL_CONFIG, then to $XDG_CONFIG_HOME/recal/config.toml \
on Linux and MacOS and %LOCALAPPDATA%/recal/config.toml on Windows when that file exists.",
                    )
                    .global(true)
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(CommonArgs::verbose())
            .subcommand(CmdValidate::command())
            .subcommand(CmdOccurrences::command())
            .subcommand(CmdFmt::command())
            .subcommand(CmdRevise::command())
    }

    /// Parse the command-line arguments
    pub fn parse() -> Result<Self, Box<dyn Error>> {
        let commands = Self::command();
        let matches = commands.get_matches();
        Self::from(&matches)
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Self::from(&matches)
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        use Commands::{Fmt, Occurrences, Revise, Validate};
        let command = match matches.subcommand() {
            Some((CmdValidate::NAME, matches)) => Validate(CmdValidate::from(matches)),
            Some((CmdOccurrences::NAME, matches)) => Occurrences(CmdOccurrences::from(matches)?),
            Some((CmdFmt::NAME, matches)) => Fmt(CmdFmt::from(matches)),
            Some((CmdRevise::NAME, matches)) => Revise(CmdRevise::from(matches)?),
            _ => return Err("No command given".into()),
        };

        Ok(Self {
            config: matches.get_one("config").cloned(),
            verbose: CommonArgs::get_verbose(matches),
            command,
        })
    }

    /// Run the command, returns whether it succeeded.
    pub async fn run(self) -> Result<bool, Box<dyn Error>> {
        tracing::debug!("parsing configuration...");
        let config = Config::load(self.config).await?;
        self.command.run(&config).await
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// Check calendar files
    Validate(CmdValidate),

    /// List instances in a window
    Occurrences(CmdOccurrences),

    /// Print a calendar in canonical form
    Fmt(CmdFmt),

    /// Edit an occurrence
    Revise(CmdRevise),
}

impl Commands {
    /// Run the command with the given configuration
    #[rustfmt::skip]
    pub async fn run(self, config: &Config) -> Result<bool, Box<dyn Error>> {
        use Commands::{Fmt, Occurrences, Revise, Validate};
        match self {
            Validate(a)    => a.run().await,
            Occurrences(a) => a.run(config).await.map(|()| true),
            Fmt(a)         => a.run(config).await.map(|()| true),
            Revise(a)      => a.run(config).await.map(|()| true),
        }
    }
}
