// SPDX-FileCopyrightText: 2026 daymark contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Cow, fmt};

use chrono::NaiveDate;
use daymark_core::Event;

use crate::parser::ArgOutputFormat;
use crate::table::{PaddingDirection, Table, TableColumn, TableStyleBasic, TableStyleJson};

/// How many id characters the table shows. Enough to paste back as a
/// unique prefix.
const SHORT_ID_LEN: usize = 8;

#[derive(Debug)]
pub struct EventFormatter {
    columns: Vec<EventColumn>,
    format: ArgOutputFormat,
}

impl EventFormatter {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            columns: vec![
                EventColumn::Id,
                EventColumn::Pin,
                EventColumn::Date,
                EventColumn::Days { today },
                EventColumn::Title,
            ],
            format: ArgOutputFormat::Table,
        }
    }

    pub fn with_output_format(mut self, format: ArgOutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format<'a>(&'a self, events: &'a [Event]) -> Display<'a> {
        Display {
            events,
            formatter: self,
        }
    }
}

#[derive(Debug)]
pub struct Display<'a> {
    events: &'a [Event],
    formatter: &'a EventFormatter,
}

impl fmt::Display for Display<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.formatter.format {
            ArgOutputFormat::Json => write!(
                f,
                "{}",
                Table::new(TableStyleJson::new(), &self.formatter.columns, self.events)
            ),
            ArgOutputFormat::Table => write!(
                f,
                "{}",
                Table::new(TableStyleBasic::new(), &self.formatter.columns, self.events)
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub enum EventColumn {
    Id,
    Pin,
    Date,
    Days { today: NaiveDate },
    Title,
}

impl TableColumn<Event> for EventColumn {
    fn name(&self) -> Cow<'_, str> {
        match self {
            EventColumn::Id => "id",
            EventColumn::Pin => "pinned",
            EventColumn::Date => "date",
            EventColumn::Days { .. } => "days",
            EventColumn::Title => "title",
        }
        .into()
    }

    fn format<'a>(&self, event: &'a Event) -> Cow<'a, str> {
        match self {
            EventColumn::Id => {
                let end = event.id.len().min(SHORT_ID_LEN);
                event.id[..end].into()
            }
            EventColumn::Pin => if event.pinned { "*" } else { "" }.into(),
            EventColumn::Date => event.date.as_str().into(),
            EventColumn::Days { today } => format_days(event, *today).into(),
            EventColumn::Title => event.title.as_str().into(),
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            EventColumn::Days { .. } => PaddingDirection::Right,
            _ => PaddingDirection::Left,
        }
    }
}

/// The day count cell. An event with a corrupt stored date renders a
/// placeholder instead of poisoning the whole listing.
pub fn format_days(event: &Event, today: NaiveDate) -> String {
    match event.days_from(today) {
        Ok(days) => format!("{} {}", days.unsigned_abs(), event.day_label(days)),
        Err(_) => "invalid date".to_string(),
    }
}
