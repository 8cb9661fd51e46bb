// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::{Path, PathBuf};

use jiff::Timestamp;
use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use recal_core::Config;
use recal_ical::{Temporal, ValueType};

const DATETIME_FORMATS: &str =
    "Expected format: YYYY-MM-DD, YYYY-MM-DD HH:MM, YYYYMMDD or YYYYMMDDTHHMMSS[Z]";

/// Parse a date or date-time given on the command line.
///
/// Dates become whole-day values, date-times without offset stay floating
/// and a trailing `Z` makes a UTC value.
pub fn parse_temporal(text: &str) -> Result<Temporal, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("Empty date-time".to_owned());
    }

    if let Ok(date) = text.parse::<Date>() {
        return Ok(Temporal::Date(date));
    }
    if let Ok(datetime) = text.parse::<DateTime>() {
        return Ok(Temporal::Floating(datetime));
    }
    if text.ends_with(['Z', 'z'])
        && let Ok(timestamp) = text.parse::<Timestamp>()
    {
        return Ok(Temporal::Utc(TimeZone::UTC.to_datetime(timestamp)));
    }

    Temporal::parse(text, ValueType::DateTime, None)
        .map_err(|_| format!("Invalid date-time `{text}`. {DATETIME_FORMATS}"))
}

/// The calendar file to work on, from the argument or the configuration.
pub fn calendar_file(arg: Option<&PathBuf>, config: &Config) -> Result<PathBuf, Box<dyn Error>> {
    arg.or(config.calendar_path.as_ref())
        .cloned()
        .ok_or_else(|| "No calendar file given and no calendar_path configured".into())
}

/// Read a calendar file.
pub async fn read_source(path: &Path) -> Result<String, Box<dyn Error>> {
    tracing::debug!(path = %path.display(), "reading calendar");
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("Failed to read {}: {e}", path.display()).into())
}
