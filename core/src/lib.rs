// SPDX-FileCopyrightText: 2026 daymark contributors
//
// SPDX-License-Identifier: Apache-2.0

//! daymark core: event model, sort rule, day counts, square cover
//! cropping, durable storage and the widget projection.

mod app;
mod config;
pub mod crop;
mod event;
pub mod images;
mod store;
mod widget;

pub use crate::app::Daymark;
pub use crate::config::{APP_NAME, Config};
pub use crate::crop::{CropParams, crop_square};
pub use crate::event::{
    COLOR_PALETTE, DATE_FORMAT, DEFAULT_COLOR, DayLabel, Event, EventDraft, EventKind, EventPatch,
    is_owned_path, parse_color, parse_date, sort_events,
};
pub use crate::store::{EMPTY_WIDGET, Store, WidgetRecord};
pub use crate::widget::{WidgetSnapshot, WidgetView};
