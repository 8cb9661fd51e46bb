// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::PathBuf;

use clap::{ArgMatches, Command, arg, value_parser};
use recal_core::{ChangeScope, Clock, Config, Reviser, instance_of, reschedule};
use recal_ical::{Calendar, FormatOptions, Temporal, parse_calendar};

use crate::arg::{CommonArgs, TemporalArgs};
use crate::util::{calendar_file, read_source};

#[derive(Debug, Clone)]
pub struct CmdRevise {
    pub file: Option<PathBuf>,
    pub uid: String,
    pub occurrence: Temporal,
    pub start: Option<Temporal>,
    pub end: Option<Temporal>,
    pub summary: Option<String>,
    pub scope: Option<ChangeScope>,
}

impl CmdRevise {
    pub const NAME: &str = "revise";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("edit")
            .about("Edit an occurrence of a series and print the calendar")
            .arg(CommonArgs::file())
            .arg(arg!(--uid <UID> "UID of the series").required(true))
            .arg(TemporalArgs::occurrence())
            .arg(TemporalArgs::start())
            .arg(TemporalArgs::end())
            .arg(arg!(-s --summary <SUMMARY> "New summary").required(false))
            .arg(
                arg!(--scope <SCOPE> "Which occurrences the edit applies to, defaults to default_scope of the configuration")
                    .required(false)
                    .value_parser(value_parser!(ChangeScope)),
            )
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            file: CommonArgs::get_file(matches),
            uid: matches
                .get_one::<String>("uid")
                .cloned()
                .ok_or("--uid is required")?,
            occurrence: TemporalArgs::get(matches, "occurrence").ok_or("--occurrence is required")?,
            start: TemporalArgs::get(matches, "start"),
            end: TemporalArgs::get(matches, "end"),
            summary: matches.get_one("summary").cloned(),
            scope: matches.get_one("scope").copied(),
        })
    }

    pub async fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        let path = calendar_file(self.file.as_ref(), config)?;
        let src = read_source(&path).await?;
        let mut calendar = parse_calendar(&src)?;

        let reviser = Reviser::new(config.clone());
        self.apply(&reviser, &mut calendar)?;

        let options = FormatOptions::default().folding(config.folding());
        print!("{}", options.write_to_string(calendar.root())?);
        Ok(())
    }

    fn apply<C: Clock>(
        &self,
        reviser: &Reviser<C>,
        calendar: &mut Calendar,
    ) -> Result<(), Box<dyn Error>> {
        let series = calendar
            .series(&self.uid)
            .ok_or_else(|| format!("No series with UID {}", self.uid))?;

        let mut edited = instance_of(&series, &self.occurrence)?;
        if self.start.is_some() || self.end.is_some() {
            let current = edited.dtstart().cloned().ok_or("The series has no DTSTART")?;
            let start = match &self.start {
                Some(start) => in_form_of(start, &current),
                None => current.clone(),
            };
            let end = self.end.as_ref().map(|end| in_form_of(end, &start));
            reschedule(&mut edited, start, end)?;
        }
        if let Some(summary) = &self.summary {
            edited.set_summary(summary.as_str())?;
        }

        let scope = self.scope.unwrap_or(reviser.config().default_scope);
        let components = reviser.revise(&series, &edited, &self.occurrence, scope)?;
        tracing::info!(uid = %self.uid, ?scope, components = components.len(), "revised");
        calendar.apply_revision(&self.uid, components)?;
        Ok(())
    }
}

/// Date-times given on the command line follow the zone of the series, dates
/// stay dates.
fn in_form_of(value: &Temporal, template: &Temporal) -> Temporal {
    if value.is_date() {
        value.clone()
    } else {
        value.retag_like(template)
    }
}
