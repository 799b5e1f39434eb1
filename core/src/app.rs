// SPDX-FileCopyrightText: 2026 daymark contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate};
use image::RgbaImage;

use crate::event::{Event, EventDraft, EventPatch, parse_date, sort_events};
use crate::images;
use crate::store::Store;
use crate::widget::WidgetSnapshot;
use crate::Config;

/// daymark application core.
///
/// Owns the in-memory event list, the working copy of the durable
/// store. There is exactly one mutator: every operation runs on this
/// struct, re-sorts, persists, and then syncs the widget record, in
/// that order.
#[derive(Debug)]
pub struct Daymark {
    now: DateTime<Local>,
    config: Config,
    store: Store,
    events: Vec<Event>,
}

impl Daymark {
    /// Creates a new daymark instance with the given configuration.
    pub async fn new(mut config: Config) -> Result<Self, Box<dyn Error>> {
        let now = Local::now();

        config.normalize()?;

        let store = Store::open(config.state_dir.as_ref())
            .await
            .map_err(|e| format!("Failed to open store: {e}"))?;

        let mut events = store.events.load().await?;
        sort_events(&mut events);

        Ok(Self {
            now,
            config,
            store,
            events,
        })
    }

    /// The current time in this instance.
    pub fn now(&self) -> DateTime<Local> {
        self.now
    }

    /// Refresh the current time to now.
    pub fn refresh_now(&mut self) {
        self.now = Local::now();
    }

    /// Today's date, used for all day counts.
    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// The normalized configuration this instance runs with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The sorted event list.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Resolves an id or unique id prefix to an event.
    pub fn get(&self, id: &str) -> Result<&Event, Box<dyn Error>> {
        self.find(id).map(|i| &self.events[i])
    }

    /// Add a new event from the given draft.
    pub async fn new_event(&mut self, draft: EventDraft) -> Result<&Event, Box<dyn Error>> {
        parse_date(&draft.date)?;

        let event = Event::from_draft(draft);
        let id = event.id.clone();
        tracing::debug!(%id, "adding event");

        self.events.push(event);
        self.flush().await?;
        self.get(&id)
    }

    /// Apply a patch to an existing event.
    pub async fn update_event(
        &mut self,
        id: &str,
        patch: EventPatch,
    ) -> Result<&Event, Box<dyn Error>> {
        if let Some(date) = &patch.date {
            parse_date(date)?;
        }

        let index = self.find(id)?;
        // A patched cover replaces the stored reference; the previous
        // file must not be orphaned when we own it.
        let previous = match &patch.cover_image {
            Some(cover) if *cover != self.events[index].cover_image => {
                self.events[index].cover_image.take()
            }
            _ => None,
        };
        patch.apply_to(&mut self.events[index]);
        let id = self.events[index].id.clone();

        if let Some(previous) = previous {
            images::delete_cover(&previous).await;
        }

        self.flush().await?;
        self.get(&id)
    }

    /// Flip the pin flag of an event.
    pub async fn toggle_pin(&mut self, id: &str) -> Result<&Event, Box<dyn Error>> {
        let index = self.find(id)?;
        let id = self.events[index].id.clone();
        let pinned = !self.events[index].pinned;
        tracing::debug!(%id, pinned, "toggling pin");

        self.update_event(
            &id,
            EventPatch {
                pinned: Some(pinned),
                ..Default::default()
            },
        )
        .await
    }

    /// Attach a cropped cover image to an event, replacing (and deleting,
    /// when owned) any previous cover file.
    pub async fn set_cover(
        &mut self,
        id: &str,
        cover: RgbaImage,
    ) -> Result<&Event, Box<dyn Error>> {
        let index = self.find(id)?;
        let images_dir = self.images_dir()?.clone();

        let path = images::save_cover(&images_dir, cover).await?;
        let path = path
            .to_str()
            .ok_or("Invalid path encoding")?
            .to_string();

        let event = &mut self.events[index];
        let previous = event.cover_image.replace(path);
        if let Some(previous) = previous {
            images::delete_cover(&previous).await;
        }
        let id = event.id.clone();

        self.flush().await?;
        self.get(&id)
    }

    /// Detach and delete (when owned) the cover image of an event.
    pub async fn clear_cover(&mut self, id: &str) -> Result<&Event, Box<dyn Error>> {
        let index = self.find(id)?;
        let event = &mut self.events[index];

        if let Some(previous) = event.cover_image.take() {
            images::delete_cover(&previous).await;
        }
        let id = event.id.clone();

        self.flush().await?;
        self.get(&id)
    }

    /// Export an event's cover into `dir` at full quality.
    pub async fn export_cover(&self, id: &str, dir: &PathBuf) -> Result<PathBuf, Box<dyn Error>> {
        let event = self.get(id)?;
        let cover = event
            .cover_image
            .as_deref()
            .ok_or("Event has no cover image")?;
        images::export_cover(cover, dir, &event.title).await
    }

    /// Delete an event, cascading to its owned cover file.
    pub async fn delete_event(&mut self, id: &str) -> Result<Event, Box<dyn Error>> {
        let index = self.find(id)?;
        let event = self.events.remove(index);
        tracing::debug!(id = %event.id, "deleting event");

        if event.owns_cover() {
            if let Some(cover) = &event.cover_image {
                images::delete_cover(cover).await;
            }
        }

        self.flush().await?;
        Ok(event)
    }

    /// Recompute and rewrite the widget record from the current list.
    pub async fn sync_widget(&self) -> Result<i64, Box<dyn Error>> {
        let snapshot = WidgetSnapshot::project(&self.events);
        let json = snapshot
            .to_json()
            .map_err(|e| format!("Failed to serialize widget event: {e}"))?;
        let version = self.store.widget.put(&json).await?;
        // The durable write above has completed; only now may the
        // surface be told to redraw.
        self.request_redraw(version);
        Ok(version)
    }

    /// Read the current widget record.
    pub async fn widget_record(&self) -> Result<crate::store::WidgetRecord, Box<dyn Error>> {
        self.store.widget.get().await
    }

    pub async fn close(self) -> Result<(), Box<dyn Error>> {
        self.store.close().await
    }

    /// Sort, persist, and mirror to the widget, strictly in that order.
    async fn flush(&mut self) -> Result<(), Box<dyn Error>> {
        sort_events(&mut self.events);
        self.store.events.save(&self.events).await?;
        self.sync_widget().await?;
        Ok(())
    }

    /// Notify all widget instances that a newer record exists.
    fn request_redraw(&self, version: i64) {
        tracing::info!(version, "widget redraw requested");
    }

    fn images_dir(&self) -> Result<&PathBuf, Box<dyn Error>> {
        self.config
            .images_dir
            .as_ref()
            .ok_or_else(|| "No images directory configured".into())
    }

    fn find(&self, id: &str) -> Result<usize, Box<dyn Error>> {
        if id.is_empty() {
            return Err("Empty event id".into());
        }

        let mut matches = self
            .events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.id.starts_with(id));

        match (matches.next(), matches.next()) {
            (Some((index, _)), None) => Ok(index),
            (Some(_), Some(_)) => Err(format!("Event id prefix {id:?} is ambiguous").into()),
            (None, _) => Err(format!("Event not found: {id}").into()),
        }
    }
}
