// SPDX-FileCopyrightText: 2026 daymark contributors
//
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDate;

use crate::Event;
use crate::store::{EMPTY_WIDGET, WidgetRecord};

/// The single-event projection mirrored to the widget surface.
///
/// Derived from the persisted list order: the first pinned event wins,
/// otherwise the chronologically-first event, otherwise nothing. With
/// several pinned events the first match in list order is taken; that
/// tie-break is implementation-defined, not a contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetSnapshot {
    event: Option<Event>,
}

impl WidgetSnapshot {
    /// Projects the display event out of a sorted event list.
    pub fn project(events: &[Event]) -> Self {
        let event = events
            .iter()
            .find(|e| e.pinned)
            .or_else(|| events.first())
            .cloned();
        Self { event }
    }

    /// Parses a snapshot back out of the stored widget record. The empty
    /// sentinel and malformed payloads both read as the empty snapshot.
    pub fn from_record(record: &WidgetRecord) -> Self {
        if record.event_json == EMPTY_WIDGET {
            return Self::default();
        }
        match serde_json::from_str(&record.event_json) {
            Ok(event) => Self { event: Some(event) },
            Err(e) => {
                tracing::warn!("Malformed widget record, rendering empty: {e}");
                Self::default()
            }
        }
    }

    /// Serializes the display event, or the empty sentinel.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        match &self.event {
            Some(event) => serde_json::to_string(event),
            None => Ok(EMPTY_WIDGET.to_string()),
        }
    }

    /// The projected event, if any.
    pub fn event(&self) -> Option<&Event> {
        self.event.as_ref()
    }

    /// Resolves the fields the widget renderer shows. An unparseable
    /// date falls back to today, so the count renders as zero instead of
    /// failing the whole surface.
    pub fn view(&self, today: NaiveDate) -> Option<WidgetView<'_>> {
        let event = self.event.as_ref()?;
        let days = event.days_from(today).unwrap_or(0);
        Some(WidgetView {
            id: &event.id,
            title: &event.title,
            days: days.unsigned_abs(),
            label: event.day_label(days).to_string(),
            color: event.color,
        })
    }
}

/// Render model for one widget instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView<'a> {
    /// Event id carried by the click action, for deep-linking back into
    /// the detail view.
    pub id: &'a str,

    /// Event title.
    pub title: &'a str,

    /// Absolute day count.
    pub days: u64,

    /// Day-count label (remaining/elapsed/accumulated).
    pub label: String,

    /// ARGB theme color.
    pub color: u32,
}
