// SPDX-FileCopyrightText: 2026 daymark contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use colored::Colorize;
use daymark_core::{Daymark, WidgetSnapshot};

use crate::parser::ArgOutputFormat;

/// Inspect the record the home-screen widget renders from, optionally
/// recomputing it first.
#[derive(Debug, Clone, Copy)]
pub struct CmdWidget {
    pub sync: bool,
    pub output_format: ArgOutputFormat,
}

impl CmdWidget {
    pub const NAME: &str = "widget";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Show the widget record")
            .arg(arg!(--sync "Recompute the record from the event list first"))
            .arg(ArgOutputFormat::arg())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            sync: matches.get_flag("sync"),
            output_format: ArgOutputFormat::from(matches),
        }
    }

    pub async fn run(self, app: &mut Daymark) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "showing widget record...");
        if self.sync {
            app.sync_widget().await?;
        }

        let record = app.widget_record().await?;
        let snapshot = WidgetSnapshot::from_record(&record);

        if self.output_format == ArgOutputFormat::Json {
            let json = serde_json::json!({
                "version": record.version,
                "event": snapshot.event(),
            });
            println!("{json}");
            return Ok(());
        }

        println!("{}  {}", "version:".dimmed(), record.version);
        match snapshot.view(app.today()) {
            Some(view) => {
                println!("{}  {} {}", view.title.bold(), view.days, view.label);
                println!("{}  {}", "event:".dimmed(), view.id);
            }
            None => println!("{}", "Widget is empty".italic()),
        }
        Ok(())
    }
}
