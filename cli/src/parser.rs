// SPDX-FileCopyrightText: 2026 daymark contributors
//
// SPDX-License-Identifier: Apache-2.0

use clap::{Arg, ArgMatches, arg, value_parser};

/// The output format for commands
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ArgOutputFormat {
    Json,
    #[default]
    Table,
}

impl ArgOutputFormat {
    pub fn arg() -> Arg {
        arg!(--"output-format" <FORMAT> "Output format")
            .value_parser(value_parser!(ArgOutputFormat))
            .default_value("table")
    }

    pub fn from(matches: &ArgMatches) -> Self {
        matches
            .get_one("output-format")
            .copied()
            .unwrap_or(ArgOutputFormat::Table)
    }
}

pub fn arg_id() -> Arg {
    arg!(id: <ID> "The id or unique id prefix of the event")
}

pub fn get_id(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("id")
        .cloned()
        .unwrap_or_default()
}

/// Parses a `DX,DY` pan offset in display pixels.
pub fn parse_pan(s: &str) -> Result<(f32, f32), String> {
    let (dx, dy) = s
        .split_once(',')
        .ok_or_else(|| format!("Invalid pan {s:?}, expected DX,DY"))?;
    let dx = dx
        .trim()
        .parse()
        .map_err(|e| format!("Invalid pan x offset {dx:?}: {e}"))?;
    let dy = dy
        .trim()
        .parse()
        .map_err(|e| format!("Invalid pan y offset {dy:?}: {e}"))?;
    Ok((dx, dy))
}
