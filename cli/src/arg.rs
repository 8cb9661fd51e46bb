// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use clap::{Arg, ArgMatches, ValueHint, arg, value_parser};
use recal_ical::Temporal;

use crate::util::parse_temporal;

#[derive(Debug, Clone, Copy)]
pub struct CommonArgs;

impl CommonArgs {
    pub fn verbose() -> Arg {
        arg!(-v --verbose "Log what recal is doing").global(true)
    }

    pub fn get_verbose(matches: &ArgMatches) -> bool {
        matches.get_flag("verbose")
    }

    pub fn file() -> Arg {
        arg!(file: [FILE] "Calendar file, defaults to calendar_path of the configuration")
            .value_parser(value_parser!(PathBuf))
            .value_hint(ValueHint::FilePath)
    }

    pub fn get_file(matches: &ArgMatches) -> Option<PathBuf> {
        matches.get_one("file").cloned()
    }

    pub fn files() -> Arg {
        arg!(file: <FILE> "Calendar files")
            .num_args(1..)
            .value_parser(value_parser!(PathBuf))
            .value_hint(ValueHint::FilePath)
    }

    pub fn get_files(matches: &ArgMatches) -> Vec<PathBuf> {
        matches
            .get_many::<PathBuf>("file")
            .map(|files| files.cloned().collect())
            .unwrap_or_default()
    }

    pub fn fold() -> Arg {
        arg!(--fold <OCTETS> "Fold lines longer than this many octets, 0 disables folding")
            .required(false)
            .value_parser(value_parser!(usize))
    }

    pub fn get_fold(matches: &ArgMatches) -> Option<usize> {
        matches.get_one("fold").copied()
    }
}

/// Date-time arguments, given as `YYYY-MM-DD[ HH:MM]` or in iCalendar form.
#[derive(Debug, Clone, Copy)]
pub struct TemporalArgs;

impl TemporalArgs {
    pub fn from() -> Arg {
        arg!(--from <DATETIME> "Start of the window, inclusive")
            .required(true)
            .value_parser(parse_temporal)
    }

    pub fn to() -> Arg {
        arg!(--to <DATETIME> "End of the window, exclusive")
            .required(true)
            .value_parser(parse_temporal)
    }

    pub fn occurrence() -> Arg {
        arg!(--occurrence <DATETIME> "The occurrence to edit, as the series would start it")
            .required(true)
            .value_parser(parse_temporal)
    }

    pub fn start() -> Arg {
        arg!(--start <DATETIME> "New start of the occurrence")
            .required(false)
            .value_parser(parse_temporal)
    }

    pub fn end() -> Arg {
        arg!(--end <DATETIME> "New end of the occurrence")
            .required(false)
            .value_parser(parse_temporal)
    }

    pub fn get(matches: &ArgMatches, id: &str) -> Option<Temporal> {
        matches.get_one::<Temporal>(id).cloned()
    }
}
