// SPDX-FileCopyrightText: 2026 daymark contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use colored::Colorize;
use daymark_core::{Daymark, Event, EventDraft, EventKind, EventPatch, parse_color};

use crate::event_formatter::{EventFormatter, format_days};
use crate::parser::{ArgOutputFormat, arg_id, get_id};

#[derive(Debug, Clone, Copy, Default)]
pub struct CmdList {
    pub output_format: ArgOutputFormat,
}

impl CmdList {
    pub const NAME: &str = "list";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("ls")
            .about("List all events, pinned first")
            .arg(ArgOutputFormat::arg())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            output_format: ArgOutputFormat::from(matches),
        }
    }

    pub async fn run(self, app: &mut Daymark) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing events...");
        let events = app.events();
        if events.is_empty() && self.output_format == ArgOutputFormat::Table {
            println!("{}", "No events found".italic());
            return Ok(());
        }

        print_events(app, events, self.output_format);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdNew {
    pub title: String,
    pub date: String,
    pub kind: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,

    pub output_format: ArgOutputFormat,
}

impl CmdNew {
    pub const NAME: &str = "new";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("add")
            .about("Add a new event")
            .arg(arg!(title: <TITLE> "The event title"))
            .arg(arg!(date: <DATE> "The target date, yyyy-mm-dd"))
            .arg(arg!(-k --kind [KIND] "Counting direction: countdown or elapsed"))
            .arg(arg!(--color [COLOR] "Theme color, #RRGGBB or #AARRGGBB"))
            .arg(arg!(-d --description [DESCRIPTION] "Free-form description"))
            .arg(ArgOutputFormat::arg())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            title: matches
                .get_one::<String>("title")
                .cloned()
                .unwrap_or_default(),
            date: matches
                .get_one::<String>("date")
                .cloned()
                .unwrap_or_default(),
            kind: matches.get_one::<String>("kind").cloned(),
            color: matches.get_one::<String>("color").cloned(),
            description: matches.get_one::<String>("description").cloned(),
            output_format: ArgOutputFormat::from(matches),
        }
    }

    pub async fn run(self, app: &mut Daymark) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "adding new event...");
        let draft = EventDraft {
            title: self.title,
            date: self.date,
            kind: match self.kind {
                Some(kind) => kind.parse()?,
                None => EventKind::default(),
            },
            color: match self.color {
                Some(color) => parse_color(&color)?,
                None => app.config().default_color(),
            },
            description: self.description.unwrap_or_default(),
        };

        let event = app.new_event(draft).await?.clone();
        print_events(app, &[event], self.output_format);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdEdit {
    pub id: String,
    pub title: Option<String>,
    pub date: Option<String>,
    pub kind: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub cover: Option<String>,

    pub output_format: ArgOutputFormat,
}

impl CmdEdit {
    pub const NAME: &str = "edit";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Edit an event")
            .arg(arg_id())
            .arg(arg!(-t --title [TITLE] "New title"))
            .arg(arg!(--date [DATE] "New target date, yyyy-mm-dd"))
            .arg(arg!(-k --kind [KIND] "Counting direction: countdown or elapsed"))
            .arg(arg!(--color [COLOR] "Theme color, #RRGGBB or #AARRGGBB"))
            .arg(arg!(-d --description [DESCRIPTION] "New description, empty clears it"))
            .arg(arg!(--cover [REFERENCE] "Cover reference to store as-is, e.g. a shared URI"))
            .arg(ArgOutputFormat::arg())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            id: get_id(matches),
            title: matches.get_one::<String>("title").cloned(),
            date: matches.get_one::<String>("date").cloned(),
            kind: matches.get_one::<String>("kind").cloned(),
            color: matches.get_one::<String>("color").cloned(),
            description: matches.get_one::<String>("description").cloned(),
            cover: matches.get_one::<String>("cover").cloned(),
            output_format: ArgOutputFormat::from(matches),
        }
    }

    pub async fn run(self, app: &mut Daymark) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "editing event...");
        let patch = EventPatch {
            title: self.title,
            date: self.date,
            kind: self.kind.as_deref().map(str::parse).transpose()?,
            color: self.color.as_deref().map(parse_color).transpose()?,
            description: self.description,
            cover_image: self.cover.map(Some),
            pinned: None,
        };
        if patch.is_empty() {
            return Err("Nothing to change".into());
        }

        let event = app.update_event(&self.id, patch).await?.clone();
        print_events(app, &[event], self.output_format);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdShow {
    pub id: String,
    pub output_format: ArgOutputFormat,
}

impl CmdShow {
    pub const NAME: &str = "show";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Show one event in detail")
            .arg(arg_id())
            .arg(ArgOutputFormat::arg())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            id: get_id(matches),
            output_format: ArgOutputFormat::from(matches),
        }
    }

    pub async fn run(self, app: &mut Daymark) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "showing event...");
        let event = app.get(&self.id)?;

        if self.output_format == ArgOutputFormat::Json {
            println!("{}", serde_json::to_string(event)?);
            return Ok(());
        }

        println!("{}  {}", event.title.bold(), format_days(event, app.today()));
        println!("{}  {}", "id:".dimmed(), event.id);
        println!("{}  {}", "date:".dimmed(), event.date);
        println!("{}  {}", "kind:".dimmed(), event.kind);
        println!("{}  #{:08X}", "color:".dimmed(), event.color);
        if event.pinned {
            println!("{}  yes", "pinned:".dimmed());
        }
        if !event.description.is_empty() {
            println!("{}  {}", "description:".dimmed(), event.description);
        }
        if let Some(cover) = &event.cover_image {
            println!("{}  {}", "cover:".dimmed(), cover);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdDelete {
    pub id: String,
}

impl CmdDelete {
    pub const NAME: &str = "delete";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("rm")
            .about("Delete an event and its owned cover image")
            .arg(arg_id())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            id: get_id(matches),
        }
    }

    pub async fn run(self, app: &mut Daymark) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "deleting event...");
        let event = app.delete_event(&self.id).await?;
        println!("Deleted {}", event.title.bold());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdPin {
    pub id: String,
}

impl CmdPin {
    pub const NAME: &str = "pin";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Pin an event to the top of the list and the widget")
            .arg(arg_id())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            id: get_id(matches),
        }
    }

    pub async fn run(self, app: &mut Daymark) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "pinning event...");
        set_pinned(app, &self.id, true).await
    }
}

#[derive(Debug, Clone)]
pub struct CmdUnpin {
    pub id: String,
}

impl CmdUnpin {
    pub const NAME: &str = "unpin";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Unpin an event")
            .arg(arg_id())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            id: get_id(matches),
        }
    }

    pub async fn run(self, app: &mut Daymark) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "unpinning event...");
        set_pinned(app, &self.id, false).await
    }
}

async fn set_pinned(app: &mut Daymark, id: &str, pinned: bool) -> Result<(), Box<dyn Error>> {
    let patch = EventPatch {
        pinned: Some(pinned),
        ..Default::default()
    };
    let event = app.update_event(id, patch).await?.clone();
    print_events(app, &[event], ArgOutputFormat::Table);
    Ok(())
}

fn print_events(app: &Daymark, events: &[Event], output_format: ArgOutputFormat) {
    let formatter = EventFormatter::new(app.today()).with_output_format(output_format);
    println!("{}", formatter.format(events));
}
