// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! recal - parse, expand and revise iCalendar files

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    recal_cli::run().await
}
