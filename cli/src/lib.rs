// SPDX-FileCopyrightText: 2026 daymark contributors
//
// SPDX-License-Identifier: Apache-2.0

//! The daymark command-line interface.

mod cli;
mod cmd_cover;
mod cmd_event;
mod cmd_generate_completion;
mod cmd_widget;
mod config;
mod event_formatter;
mod parser;
mod table;

pub use crate::cli::{Cli, Commands, run};
