// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::PathBuf;

use clap::{ArgAction, ArgMatches, Command, arg};
use recal_core::Config;
use recal_ical::{Calendar, ComponentKind, FormatOptions, parse};

use crate::arg::CommonArgs;
use crate::util::{calendar_file, read_source};

#[derive(Debug, Clone)]
pub struct CmdFmt {
    pub file: Option<PathBuf>,
    pub fold: Option<usize>,
    pub wrap: bool,
}

impl CmdFmt {
    pub const NAME: &str = "fmt";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Print a calendar file in canonical form")
            .arg(CommonArgs::file())
            .arg(CommonArgs::fold())
            .arg(
                arg!(--wrap "Wrap a bare component into a VCALENDAR with the configured PRODID")
                    .action(ArgAction::SetTrue),
            )
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            file: CommonArgs::get_file(matches),
            fold: CommonArgs::get_fold(matches),
            wrap: matches.get_flag("wrap"),
        }
    }

    pub async fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        let path = calendar_file(self.file.as_ref(), config)?;
        let src = read_source(&path).await?;
        print!("{}", self.format(&src, config)?);
        Ok(())
    }

    fn format(&self, src: &str, config: &Config) -> Result<String, Box<dyn Error>> {
        let mut root = parse(src)?;
        if self.wrap && root.kind() != &ComponentKind::Calendar {
            let mut calendar = Calendar::new(config.prod_id.as_str());
            calendar.add_component(root);
            root = calendar.into_root();
        }
        let folding = match self.fold {
            Some(0) => None,
            Some(width) => Some(width),
            None => config.folding(),
        };
        Ok(FormatOptions::default().folding(folding).write_to_string(&root)?)
    }
}

#[cfg(test)]
mod tests {
    use clap::Command;

    use super::*;

    const SLOPPY: &str = "begin:vevent\nuid:1@example.com\ndtstamp:20250101T000000Z\nsummary:A summary long enough to need folding when printed at forty octets\nend:vevent\n";

    #[test]
    fn test_parse_fmt() {
        let cmd = Command::new("test").subcommand(CmdFmt::command());
        let matches = cmd
            .try_get_matches_from(["test", "fmt", "cal.ics", "--fold", "40"])
            .unwrap();
        let parsed = CmdFmt::from(matches.subcommand_matches("fmt").unwrap());
        assert_eq!(parsed.file, Some(PathBuf::from("cal.ics")));
        assert_eq!(parsed.fold, Some(40));
        assert!(!parsed.wrap);
    }

    #[test]
    fn test_format_canonical() {
        let cmd = CmdFmt {
            file: None,
            fold: Some(0),
            wrap: false,
        };
        let out = cmd.format(SLOPPY, &Config::default()).unwrap();
        assert!(out.starts_with("BEGIN:VEVENT\r\nUID:1@example.com\r\n"), "{out}");
        assert!(out.ends_with("END:VEVENT\r\n"));
        assert_eq!(out.lines().count(), 5);

        let folded = CmdFmt {
            file: None,
            fold: Some(40),
            wrap: false,
        };
        let out = folded.format(SLOPPY, &Config::default()).unwrap();
        assert!(out.split("\r\n").all(|line| line.len() <= 40), "{out}");
        assert!(out.lines().count() > 5);
    }

    #[test]
    fn test_format_uses_config_width() {
        let config = Config {
            fold_width: 0,
            ..Config::default()
        };
        let cmd = CmdFmt {
            file: None,
            fold: None,
            wrap: false,
        };
        let out = cmd.format(SLOPPY, &config).unwrap();
        assert_eq!(out.lines().count(), 5);
    }

    #[test]
    fn test_format_wrap() {
        let config = Config {
            prod_id: "-//Example//Planner//EN".to_owned(),
            ..Config::default()
        };
        let cmd = CmdFmt {
            file: None,
            fold: Some(0),
            wrap: true,
        };
        let out = cmd.format(SLOPPY, &config).unwrap();
        assert!(out.starts_with("BEGIN:VCALENDAR\r\nPRODID:-//Example//Planner//EN\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\n"), "{out}");
        assert!(out.ends_with("END:VEVENT\r\nEND:VCALENDAR\r\n"));
    }
}
