// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line interface for validating, expanding, formatting and revising
//! iCalendar files.

mod arg;
mod cli;
mod cmd_fmt;
mod cmd_occurrences;
mod cmd_revise;
mod cmd_validate;
mod report;
mod util;

pub use crate::cli::{Cli, Commands, LOG_ENV, run};
pub use crate::cmd_fmt::CmdFmt;
pub use crate::cmd_occurrences::CmdOccurrences;
pub use crate::cmd_revise::CmdRevise;
pub use crate::cmd_validate::CmdValidate;
