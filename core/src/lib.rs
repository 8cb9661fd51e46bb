// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Series revision on top of `recal-ical`, and the shared configuration.

mod config;
mod revision;

pub use crate::config::{APP_NAME, CONFIG_ENV, Config, ConfigError};
pub use crate::revision::{
    ChangeScope, Clock, RevisionError, Reviser, SystemClock, instance_of, reschedule,
};
