// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{ArgMatches, Command, arg};
use recal_core::Config;
use recal_ical::{Calendar, Temporal, parse_calendar};

use crate::arg::{CommonArgs, TemporalArgs};
use crate::util::{calendar_file, read_source};

#[derive(Debug, Clone)]
pub struct CmdOccurrences {
    pub file: Option<PathBuf>,
    pub from: Temporal,
    pub to: Temporal,
    pub uid: Option<String>,
}

impl CmdOccurrences {
    pub const NAME: &str = "occurrences";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("ls")
            .about("List the instances starting in a window")
            .arg(CommonArgs::file())
            .arg(TemporalArgs::from())
            .arg(TemporalArgs::to())
            .arg(arg!(--uid <UID> "Only the series with this UID").required(false))
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            file: CommonArgs::get_file(matches),
            from: TemporalArgs::get(matches, "from").ok_or("--from is required")?,
            to: TemporalArgs::get(matches, "to").ok_or("--to is required")?,
            uid: matches.get_one("uid").cloned(),
        })
    }

    pub async fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        let path = calendar_file(self.file.as_ref(), config)?;
        let src = read_source(&path).await?;
        let calendar = parse_calendar(&src)?;
        self.write(&calendar, &mut io::stdout().lock())
    }

    /// One line per instance: start, end, UID and summary, separated by tabs.
    fn write(&self, calendar: &Calendar, w: &mut impl Write) -> Result<(), Box<dyn Error>> {
        if let Some(uid) = &self.uid
            && calendar.series(uid).is_none()
        {
            return Err(format!("No series with UID {uid}").into());
        }

        let instances = calendar.expand(&self.from, &self.to);
        tracing::debug!(count = instances.len(), "expanded");
        for instance in instances {
            let uid = instance.component.uid().unwrap_or_default();
            if self.uid.as_deref().is_some_and(|wanted| wanted != uid) {
                continue;
            }
            let end = instance.end.as_ref().map_or_else(|| "-".to_owned(), ToString::to_string);
            writeln!(
                w,
                "{}\t{end}\t{uid}\t{}",
                instance.start,
                instance.component.summary().unwrap_or_default()
            )?;
        }
        Ok(())
    }
}
