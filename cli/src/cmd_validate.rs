// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ariadne::ReportKind;
use clap::{ArgMatches, Command};
use colored::Colorize;
use recal_ical::parse_calendar;

use crate::arg::CommonArgs;
use crate::report::{retained_errors, write_parse_error};
use crate::util::read_source;

#[derive(Debug, Clone)]
pub struct CmdValidate {
    pub files: Vec<PathBuf>,
}

impl CmdValidate {
    pub const NAME: &str = "validate";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("check")
            .about("Check calendar files against RFC 5545")
            .arg(CommonArgs::files())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            files: CommonArgs::get_files(matches),
        }
    }

    /// Returns whether every file is valid.
    pub async fn run(self) -> Result<bool, Box<dyn Error>> {
        tracing::debug!(files = self.files.len(), "validating");
        let mut valid = true;
        for path in &self.files {
            let src = read_source(path).await?;
            let mut out = io::stdout().lock();
            valid &= check(path, &src, &mut out)?;
        }
        Ok(valid)
    }
}

/// Check one calendar, writing what is wrong with it to `w`.
fn check(path: &Path, src: &str, w: &mut impl Write) -> io::Result<bool> {
    let calendar = match parse_calendar(src) {
        Ok(calendar) => calendar,
        Err(err) => {
            writeln!(w, "{} {}", "Invalid:".red(), path.display())?;
            write_parse_error(&err, ReportKind::Error, src, w)?;
            return Ok(false);
        }
    };

    let retained = retained_errors(calendar.root());
    let violations: Vec<String> = calendar
        .validate()
        .into_iter()
        .filter(|m| !retained.iter().any(|e| m.ends_with(&e.to_string())))
        .collect();
    if retained.is_empty() && violations.is_empty() {
        writeln!(w, "{} {}", "Valid:".green(), path.display())?;
        return Ok(true);
    }

    writeln!(w, "{} {}", "Invalid:".red(), path.display())?;
    for error in retained {
        write_parse_error(error, ReportKind::Warning, src, w)?;
    }
    for violation in violations {
        writeln!(w, "  {violation}")?;
    }
    Ok(false)
}
