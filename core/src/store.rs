// SPDX-FileCopyrightText: 2026 daymark contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::PathBuf;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::Event;

/// Fixed key under which the serialized event list lives.
const EVENTS_KEY: &str = "saved_events";

/// Sentinel written to the widget record when there is nothing to show.
pub const EMPTY_WIDGET: &str = "";

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS widget (
    id         INTEGER PRIMARY KEY CHECK (id = 0),
    event_json TEXT NOT NULL DEFAULT '',
    version    INTEGER NOT NULL DEFAULT 0
);
";

/// The local durable store: a string-keyed record table for the event
/// list plus the small two-field record consumed by the widget surface.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,

    pub events: EventsStore,
    pub widget: WidgetStore,
}

impl Store {
    /// Opens a sqlite database connection.
    /// If `state_dir` is `None`, it opens an in-memory database.
    pub async fn open(state_dir: Option<&PathBuf>) -> Result<Self, Box<dyn Error>> {
        let options = match state_dir {
            Some(dir) => {
                const NAME: &str = "daymark.db";

                tracing::info!("Connecting to SQLite database at {}", dir.display());
                tokio::fs::create_dir_all(dir)
                    .await
                    .map_err(|e| format!("Failed to create state directory: {e}"))?;
                let dir = dir.to_str().ok_or("Invalid path encoding")?;
                SqliteConnectOptions::new()
                    .filename(format!("{dir}/{NAME}"))
                    .create_if_missing(true)
            }
            None => {
                tracing::info!("Connecting to in-memory SQLite database");
                SqliteConnectOptions::new().in_memory(true)
            }
        };

        // One connection keeps the in-memory database alive and shared.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| format!("Failed to connect to SQLite database: {e}"))?;

        sqlx::raw_sql(SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| format!("Failed to create tables: {e}"))?;

        let events = EventsStore::new(pool.clone());
        let widget = WidgetStore::new(pool.clone());
        Ok(Store {
            pool,
            events,
            widget,
        })
    }

    pub async fn close(self) -> Result<(), Box<dyn Error>> {
        tracing::debug!("Closing database connection");
        self.pool.close().await;
        Ok(())
    }
}

/// The serialized event list under its fixed key.
#[derive(Debug, Clone)]
pub struct EventsStore {
    pool: SqlitePool,
}

impl EventsStore {
    fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Writes the full event list as one JSON document.
    pub async fn save(&self, events: &[Event]) -> Result<(), Box<dyn Error>> {
        const SQL: &str = "\
INSERT INTO kv (key, value) VALUES (?, ?)
ON CONFLICT(key) DO UPDATE SET value = excluded.value;
";

        let json = serde_json::to_string(events)
            .map_err(|e| format!("Failed to serialize events: {e}"))?;
        sqlx::query(SQL)
            .bind(EVENTS_KEY)
            .bind(json)
            .execute(&self.pool)
            .await
            .map_err(|e| format!("Failed to save events: {e}"))?;
        Ok(())
    }

    /// Loads the event list. A missing record or malformed document
    /// yields an empty list, never an error.
    pub async fn load(&self) -> Result<Vec<Event>, Box<dyn Error>> {
        const SQL: &str = "SELECT value FROM kv WHERE key = ?;";

        let row: Option<(String,)> = sqlx::query_as(SQL)
            .bind(EVENTS_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| format!("Failed to load events: {e}"))?;

        let Some((json,)) = row else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&json) {
            Ok(events) => Ok(events),
            Err(e) => {
                tracing::warn!("Malformed persisted event list, starting empty: {e}");
                Ok(Vec::new())
            }
        }
    }
}

/// The two-field record consumed by the widget surface: the serialized
/// display event (or the empty sentinel) and a version counter whose
/// only purpose is to force a redraw even when the content is unchanged.
#[derive(Debug, Clone)]
pub struct WidgetStore {
    pool: SqlitePool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct WidgetRecord {
    pub event_json: String,
    pub version: i64,
}

impl WidgetStore {
    fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Writes the display event and bumps the version counter.
    /// Returns the new version.
    pub async fn put(&self, event_json: &str) -> Result<i64, Box<dyn Error>> {
        const SQL: &str = "\
INSERT INTO widget (id, event_json, version) VALUES (0, ?, 1)
ON CONFLICT(id) DO UPDATE SET
    event_json = excluded.event_json,
    version    = widget.version + 1
RETURNING version;
";

        let row: (i64,) = sqlx::query_as(SQL)
            .bind(event_json)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| format!("Failed to write widget record: {e}"))?;
        Ok(row.0)
    }

    /// Reads the current widget record; the default (empty sentinel,
    /// version 0) if nothing has been written yet.
    pub async fn get(&self) -> Result<WidgetRecord, Box<dyn Error>> {
        const SQL: &str = "SELECT event_json, version FROM widget WHERE id = 0;";

        let record = sqlx::query_as(SQL)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| format!("Failed to read widget record: {e}"))?;
        Ok(record.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{DEFAULT_COLOR, EventKind};

    async fn setup_test_store() -> Store {
        Store::open(None).await.expect("Failed to open test store")
    }

    fn test_event(id: &str, date: &str) -> Event {
        Event {
            id: id.to_string(),
            title: format!("Event {id}"),
            date: date.to_string(),
            color: DEFAULT_COLOR,
            kind: EventKind::Countdown,
            description: String::new(),
            cover_image: None,
            pinned: false,
        }
    }

    #[tokio::test]
    async fn events_save_then_load_round_trips() {
        let store = setup_test_store().await;
        let events = vec![test_event("a", "2025-01-01"), test_event("b", "2025-02-02")];

        store.events.save(&events).await.unwrap();
        let loaded = store.events.load().await.unwrap();

        assert_eq!(loaded, events);
    }

    #[tokio::test]
    async fn events_save_overwrites_previous_list() {
        let store = setup_test_store().await;
        store
            .events
            .save(&[test_event("a", "2025-01-01")])
            .await
            .unwrap();
        store
            .events
            .save(&[test_event("b", "2025-02-02")])
            .await
            .unwrap();

        let loaded = store.events.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "b");
    }

    #[tokio::test]
    async fn events_load_empty_store_yields_empty_list() {
        let store = setup_test_store().await;
        assert!(store.events.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn events_load_recovers_from_malformed_json() {
        let store = setup_test_store().await;
        sqlx::query("INSERT INTO kv (key, value) VALUES ('saved_events', '{not json');")
            .execute(&store.pool)
            .await
            .unwrap();

        assert!(store.events.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn widget_put_bumps_version_even_when_unchanged() {
        let store = setup_test_store().await;

        let v1 = store.widget.put("{\"id\":\"a\"}").await.unwrap();
        let v2 = store.widget.put("{\"id\":\"a\"}").await.unwrap();

        assert_eq!(v1, 1);
        assert_eq!(v2, 2);
        let record = store.widget.get().await.unwrap();
        assert_eq!(record.version, 2);
        assert_eq!(record.event_json, "{\"id\":\"a\"}");
    }

    #[tokio::test]
    async fn widget_empty_sentinel_still_increments() {
        let store = setup_test_store().await;
        store.widget.put("{\"id\":\"a\"}").await.unwrap();

        let v = store.widget.put(EMPTY_WIDGET).await.unwrap();

        assert_eq!(v, 2);
        let record = store.widget.get().await.unwrap();
        assert_eq!(record.event_json, EMPTY_WIDGET);
    }

    #[tokio::test]
    async fn widget_get_defaults_before_first_write() {
        let store = setup_test_store().await;
        let record = store.widget.get().await.unwrap();
        assert_eq!(record, WidgetRecord::default());
    }
}
