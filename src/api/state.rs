//! Shared state handed to every handler.

use crate::{core::reminder::DEFAULT_UPCOMING_WINDOW_DAYS, photos::PhotoStore};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Everything a request handler needs, cloned per request.
#[derive(Clone)]
pub struct AppState {
    /// Database pool
    pub db: DatabaseConnection,
    /// Where uploaded photos go; `None` means uploads are switched off
    pub photos: Option<Arc<dyn PhotoStore>>,
    /// Window used by the upcoming reminders view when `days` is omitted
    pub upcoming_window_days: u32,
    /// Source of "today" for scheduling
    pub today: fn() -> NaiveDate,
}

impl AppState {
    /// State with no photo store, a 7 day window and the server's local date.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            photos: None,
            upcoming_window_days: DEFAULT_UPCOMING_WINDOW_DAYS,
            today: local_today,
        }
    }

    /// Enables photo uploads.
    #[must_use]
    pub fn with_photo_store(mut self, store: Arc<dyn PhotoStore>) -> Self {
        self.photos = Some(store);
        self
    }

    /// Changes the default upcoming window.
    #[must_use]
    pub const fn with_upcoming_window(mut self, days: u32) -> Self {
        self.upcoming_window_days = days;
        self
    }

    /// Replaces the date source.
    #[must_use]
    pub const fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }
}

/// Today's date in the server's local time zone.
#[must_use]
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
