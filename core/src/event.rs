// SPDX-FileCopyrightText: 2026 daymark contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;
use uuid::Uuid;

/// Date format used everywhere an event date is parsed or rendered.
/// Lexicographic order on the stored string equals chronological order.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default cover color, the first entry of the picker palette.
pub const DEFAULT_COLOR: u32 = 0xFFF4_8FB1;

/// The cover color palette offered by the picker.
pub const COLOR_PALETTE: [u32; 5] = [
    0xFFF4_8FB1,
    0xFF80_DEEA,
    0xFFFB_C02D,
    0xFFA5_D6A7,
    0xFFCE_93D8,
];

/// A single user-created date record.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Event {
    /// Opaque unique identifier, immutable for the lifetime of the event.
    pub id: String,

    /// The display title of the event.
    pub title: String,

    /// The target date as a `yyyy-mm-dd` string.
    pub date: String,

    /// 32-bit ARGB theme color.
    pub color: u32,

    /// Whether the event counts down to or accumulates from its date.
    #[serde(default)]
    pub kind: EventKind,

    /// Free-form description.
    #[serde(default)]
    pub description: String,

    /// Local path of the cover image, if one is attached.
    #[serde(default)]
    pub cover_image: Option<String>,

    /// Pinned events sort first and feed the widget projection.
    #[serde(default)]
    pub pinned: bool,
}

impl Event {
    /// Materializes a draft into a new event with a fresh id.
    pub(crate) fn from_draft(draft: EventDraft) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            date: draft.date,
            color: draft.color,
            kind: draft.kind,
            description: draft.description,
            cover_image: None,
            pinned: false,
        }
    }

    /// Signed whole-day distance from `today` to the event date.
    ///
    /// Non-negative means days remaining, negative days elapsed. Fails if
    /// the stored date is not a valid calendar date; callers must scope
    /// the failure to this single event.
    pub fn days_from(&self, today: NaiveDate) -> Result<i64, chrono::ParseError> {
        let target = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)?;
        Ok((target - today).num_days())
    }

    /// The label shown next to the day count.
    pub fn day_label(&self, days: i64) -> DayLabel {
        match self.kind {
            EventKind::Elapsed => DayLabel::Accumulated,
            EventKind::Countdown if days >= 0 => DayLabel::Remaining,
            EventKind::Countdown => DayLabel::Elapsed,
        }
    }

    /// Whether the current cover path points at a file we own and may
    /// delete. References with a URI scheme belong to someone else.
    pub fn owns_cover(&self) -> bool {
        matches!(&self.cover_image, Some(path) if is_owned_path(path))
    }
}

/// True for plain local paths, false for `scheme://` references.
pub fn is_owned_path(path: &str) -> bool {
    !path.is_empty() && !path.contains("://")
}

/// Parses a `#RRGGBB` or `#AARRGGBB` color into its ARGB value. A
/// six-digit color gets an opaque alpha channel.
pub fn parse_color(s: &str) -> Result<u32, Box<dyn Error>> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    let value = u32::from_str_radix(hex, 16)
        .map_err(|e| format!("Invalid color {s:?}, expected hex digits: {e}"))?;
    match hex.len() {
        6 => Ok(0xFF00_0000 | value),
        8 => Ok(value),
        n => Err(format!("Invalid color {s:?}: expected 6 or 8 hex digits, got {n}").into()),
    }
}

/// Parses and validates a `yyyy-mm-dd` date string.
pub fn parse_date(s: &str) -> Result<NaiveDate, Box<dyn Error>> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| format!("Invalid date {s:?}, expected yyyy-mm-dd: {e}").into())
}

/// Sorts events for display and persistence: pinned entries first, then
/// ascending by date string within each partition. The sort is stable,
/// so equal dates keep insertion order.
pub fn sort_events(events: &mut [Event]) {
    events.sort_by(|a, b| b.pinned.cmp(&a.pinned).then_with(|| a.date.cmp(&b.date)));
}

/// Draft for an event, used for creating new events.
#[derive(Debug, Clone)]
pub struct EventDraft {
    /// The display title.
    pub title: String,

    /// The target date as a `yyyy-mm-dd` string.
    pub date: String,

    /// Counting direction.
    pub kind: EventKind,

    /// 32-bit ARGB theme color.
    pub color: u32,

    /// Free-form description.
    pub description: String,
}

/// Patch for an event, allowing partial updates.
#[derive(Debug, Default, Clone)]
pub struct EventPatch {
    /// New title, if set.
    pub title: Option<String>,

    /// New date string, if set.
    pub date: Option<String>,

    /// New counting direction, if set.
    pub kind: Option<EventKind>,

    /// New theme color, if set.
    pub color: Option<u32>,

    /// New description; `Some(String::new())` clears it.
    pub description: Option<String>,

    /// New cover reference; `Some(None)` detaches it. Setting a path
    /// here stores the reference as-is, it does not copy the file.
    pub cover_image: Option<Option<String>>,

    /// New pin state, if set.
    pub pinned: Option<bool>,
}

impl EventPatch {
    /// Is this patch empty, meaning no fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.date.is_none()
            && self.kind.is_none()
            && self.color.is_none()
            && self.description.is_none()
            && self.cover_image.is_none()
            && self.pinned.is_none()
    }

    /// Applies the patch to a mutable event, modifying it in place.
    pub(crate) fn apply_to(&self, event: &mut Event) {
        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(date) = &self.date {
            event.date = date.clone();
        }
        if let Some(kind) = self.kind {
            event.kind = kind;
        }
        if let Some(color) = self.color {
            event.color = color;
        }
        if let Some(description) = &self.description {
            event.description = description.clone();
        }
        if let Some(cover_image) = &self.cover_image {
            event.cover_image = cover_image.clone();
        }
        if let Some(pinned) = self.pinned {
            event.pinned = pinned;
        }
    }
}

/// Counting direction of an event.
///
/// The wire encoding is an integer (0 countdown, 1 elapsed) to stay
/// compatible with the persisted list format.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum EventKind {
    /// Days remaining until the date.
    #[default]
    Countdown,

    /// Days accumulated since the date.
    Elapsed,
}

impl From<EventKind> for u8 {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Countdown => 0,
            EventKind::Elapsed => 1,
        }
    }
}

impl TryFrom<u8> for EventKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EventKind::Countdown),
            1 => Ok(EventKind::Elapsed),
            _ => Err(format!("Unknown event kind: {value}")),
        }
    }
}

const KIND_COUNTDOWN: &str = "countdown";
const KIND_ELAPSED: &str = "elapsed";

impl AsRef<str> for EventKind {
    fn as_ref(&self) -> &str {
        match self {
            EventKind::Countdown => KIND_COUNTDOWN,
            EventKind::Elapsed => KIND_ELAPSED,
        }
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            KIND_COUNTDOWN => Ok(EventKind::Countdown),
            KIND_ELAPSED => Ok(EventKind::Elapsed),
            _ => Err(format!(
                "Unknown event kind {value:?}, expected {KIND_COUNTDOWN} or {KIND_ELAPSED}"
            )),
        }
    }
}

/// How a day count is labeled in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayLabel {
    /// Days remaining until a countdown date.
    Remaining,

    /// Days elapsed past a countdown date.
    Elapsed,

    /// Accumulated days of an elapsed-kind event, regardless of sign.
    Accumulated,
}

impl AsRef<str> for DayLabel {
    fn as_ref(&self) -> &str {
        match self {
            DayLabel::Remaining => "remaining",
            DayLabel::Elapsed => "elapsed",
            DayLabel::Accumulated => "accumulated",
        }
    }
}

impl Display for DayLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, date: &str, pinned: bool) -> Event {
        Event {
            id: id.to_string(),
            title: id.to_string(),
            date: date.to_string(),
            color: DEFAULT_COLOR,
            kind: EventKind::Countdown,
            description: String::new(),
            cover_image: None,
            pinned,
        }
    }

    fn ids(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_sort_pinned_before_unpinned() {
        let mut events = vec![
            event("a", "2025-01-01", false),
            event("b", "2024-06-01", true),
        ];
        sort_events(&mut events);
        assert_eq!(ids(&events), vec!["b", "a"]);
    }

    #[test]
    fn test_sort_by_date_within_partition() {
        let mut events = vec![
            event("late", "2025-12-31", false),
            event("early", "2025-01-01", false),
            event("pinned-late", "2025-12-31", true),
            event("pinned-early", "2025-01-01", true),
        ];
        sort_events(&mut events);
        assert_eq!(ids(&events), vec!["pinned-early", "pinned-late", "early", "late"]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut events = vec![
            event("c", "2025-03-01", false),
            event("a", "2025-01-01", true),
            event("b", "2025-02-01", false),
        ];
        sort_events(&mut events);
        let once = events.clone();
        sort_events(&mut events);
        assert_eq!(events, once);
    }

    #[test]
    fn test_sort_equal_dates_keep_insertion_order() {
        let mut events = vec![
            event("first", "2025-05-05", false),
            event("second", "2025-05-05", false),
        ];
        sort_events(&mut events);
        assert_eq!(ids(&events), vec!["first", "second"]);
    }

    #[test]
    fn test_sort_pin_toggle_example() {
        // [{A, 2025-01-01, unpinned}, {B, 2024-06-01, pinned}] -> [B, A]
        let mut events = vec![
            event("A", "2025-01-01", false),
            event("B", "2024-06-01", true),
        ];
        sort_events(&mut events);
        assert_eq!(ids(&events), vec!["B", "A"]);

        // Pin A as well: B still sorts first because its date is earlier.
        events.iter_mut().find(|e| e.id == "A").unwrap().pinned = true;
        sort_events(&mut events);
        assert_eq!(ids(&events), vec!["B", "A"]);
    }

    #[test]
    fn test_days_from_signed() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let future = event("f", "2025-06-25", false);
        let past = event("p", "2025-06-05", false);
        assert_eq!(future.days_from(today).unwrap(), 10);
        assert_eq!(past.days_from(today).unwrap(), -10);
    }

    #[test]
    fn test_days_from_antisymmetric() {
        let a = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let toward_b = event("e", "2026-03-14", false);
        let toward_a = event("e", "2025-01-01", false);
        assert_eq!(
            toward_b.days_from(a).unwrap(),
            -toward_a.days_from(b).unwrap()
        );
    }

    #[test]
    fn test_days_from_rejects_invalid_date() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let bad = event("x", "not-a-date", false);
        assert!(bad.days_from(today).is_err());

        let bad_day = event("y", "2025-02-30", false);
        assert!(bad_day.days_from(today).is_err());
    }

    #[test]
    fn test_day_label_countdown() {
        let e = event("e", "2025-01-01", false);
        assert_eq!(e.day_label(3), DayLabel::Remaining);
        assert_eq!(e.day_label(0), DayLabel::Remaining);
        assert_eq!(e.day_label(-3), DayLabel::Elapsed);
    }

    #[test]
    fn test_day_label_elapsed_kind_is_fixed() {
        let mut e = event("e", "2025-01-01", false);
        e.kind = EventKind::Elapsed;
        assert_eq!(e.day_label(3), DayLabel::Accumulated);
        assert_eq!(e.day_label(-3), DayLabel::Accumulated);
    }

    #[test]
    fn test_owned_path() {
        assert!(is_owned_path("/data/covers/event_cover_x.jpg"));
        assert!(!is_owned_path("content://media/external/images/42"));
        assert!(!is_owned_path("https://example.com/a.jpg"));
        assert!(!is_owned_path(""));
    }

    #[test]
    fn test_patch_apply() {
        let mut e = event("e", "2025-01-01", false);
        let patch = EventPatch {
            title: Some("renamed".into()),
            date: Some("2025-02-02".into()),
            kind: Some(EventKind::Elapsed),
            description: Some(String::new()),
            pinned: Some(true),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        patch.apply_to(&mut e);
        assert_eq!(e.title, "renamed");
        assert_eq!(e.date, "2025-02-02");
        assert_eq!(e.kind, EventKind::Elapsed);
        assert!(e.description.is_empty());
        assert!(e.pinned);
        assert_eq!(e.id, "e"); // never touched
    }

    #[test]
    fn test_kind_wire_encoding() {
        let e = event("e", "2025-01-01", false);
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"kind\":0"));

        let mut elapsed = e.clone();
        elapsed.kind = EventKind::Elapsed;
        let json = serde_json::to_string(&elapsed).unwrap();
        assert!(json.contains("\"kind\":1"));

        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, EventKind::Elapsed);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#F48FB1").unwrap(), 0xFFF4_8FB1);
        assert_eq!(parse_color("#80F48FB1").unwrap(), 0x80F4_8FB1);
        assert_eq!(parse_color("F48FB1").unwrap(), 0xFFF4_8FB1);
        assert!(parse_color("#F48F").is_err());
        assert!(parse_color("#GGGGGG").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2025-06-15").is_ok());
        assert!(parse_date("2025-13-01").is_err());
        assert!(parse_date("15/06/2025").is_err());
    }
}
