//! Reminder scheduling - computing and advancing care due dates.
//!
//! A `(plant, type)` pair is either inactive (no row, or `is_active = false`) or
//! active with a `next_reminder` date. Saving a type that is already active
//! overwrites that row in place. Completing a reminder records today's date and
//! schedules the next occurrence `interval_days` from today, not from the date it
//! was due, so late care does not pile up catch-up reminders.
//!
//! Nothing here runs on a timer: "due" is computed when `list_upcoming` is asked.
//!
//! The find-then-overwrite-or-insert in `save` is not isolated from a concurrent
//! `save` for the same pair; two simultaneous first saves can both insert. The
//! next `save` for that pair then updates the oldest row only.

use crate::{
    core::access,
    entities::{PlantType, Reminder, ReminderType, UserPlant, plant_type, reminder, user_plant},
    errors::{Error, Result},
};
use chrono::{Days, NaiveDate};
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::Expr};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Look-ahead used for the upcoming view when the caller does not pick one.
pub const DEFAULT_UPCOMING_WINDOW_DAYS: u32 = 7;

/// An active reminder together with the plant it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingReminder {
    /// The reminder row
    #[serde(flatten)]
    pub reminder: reminder::Model,
    /// Id of the user plant
    pub plant_id: i64,
    /// Cultivar of the plant
    pub plant_name: String,
    /// Species of the plant
    pub plant_species: String,
}

/// Adds `days` calendar days to `date`.
///
/// # Errors
/// Returns a validation error if `days` is below 1 or the result overflows the
/// supported date range.
pub fn next_due(date: NaiveDate, days: i32) -> Result<NaiveDate> {
    let step = u64::try_from(days)
        .ok()
        .filter(|d| *d >= 1)
        .ok_or_else(|| Error::validation("intervalDays", "interval must be at least 1 day"))?;

    date.checked_add_days(Days::new(step))
        .ok_or_else(|| Error::validation("intervalDays", "next reminder date is out of range"))
}

/// Creates or overwrites the active reminder of `reminder_type` for a plant.
///
/// Returns `None` when the plant is not visible to `user_id`.
///
/// # Errors
/// Returns a validation error if `interval_days` is below 1.
#[instrument(skip(db, notes))]
pub async fn save(
    db: &DatabaseConnection,
    user_id: i64,
    plant_id: i64,
    reminder_type: ReminderType,
    interval_days: i32,
    start_date: NaiveDate,
    notes: Option<String>,
) -> Result<Option<reminder::Model>> {
    let next_reminder = next_due(start_date, interval_days)?;

    if access::owned_plant(db, user_id, plant_id).await?.is_none() {
        return Ok(None);
    }

    let notes = notes.filter(|n| !n.trim().is_empty());

    let existing = Reminder::find()
        .filter(reminder::Column::UserPlantId.eq(plant_id))
        .filter(reminder::Column::ReminderType.eq(reminder_type))
        .filter(reminder::Column::IsActive.eq(true))
        .order_by_asc(reminder::Column::Id)
        .one(db)
        .await?;

    let saved = if let Some(existing) = existing {
        debug!(reminder_id = existing.id, "overwriting active reminder");
        let mut active: reminder::ActiveModel = existing.into();
        active.interval_days = Set(interval_days);
        active.start_date = Set(start_date);
        active.next_reminder = Set(next_reminder);
        active.notes = Set(notes);
        active.update(db).await?
    } else {
        reminder::ActiveModel {
            user_plant_id: Set(plant_id),
            reminder_type: Set(reminder_type),
            start_date: Set(start_date),
            interval_days: Set(interval_days),
            next_reminder: Set(next_reminder),
            last_completed: Set(None),
            notes: Set(notes),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(db)
        .await?
    };

    info!(
        reminder_id = saved.id,
        next_reminder = %saved.next_reminder,
        "saved {:?} reminder",
        reminder_type
    );
    Ok(Some(saved))
}

/// Marks a reminder done on `today` and schedules the next occurrence from it.
///
/// Returns `None` when the reminder is not visible to `user_id`.
#[instrument(skip(db))]
pub async fn complete(
    db: &DatabaseConnection,
    user_id: i64,
    reminder_id: i64,
    today: NaiveDate,
) -> Result<Option<reminder::Model>> {
    let Some(existing) = access::owned_reminder(db, user_id, reminder_id).await? else {
        return Ok(None);
    };

    let next_reminder = next_due(today, existing.interval_days)?;

    let mut active: reminder::ActiveModel = existing.into();
    active.last_completed = Set(Some(today));
    active.next_reminder = Set(next_reminder);
    let updated = active.update(db).await?;

    info!(reminder_id, next_reminder = %updated.next_reminder, "completed reminder");
    Ok(Some(updated))
}

/// Deactivates a reminder. Returns `false` if nothing visible matched.
///
/// Dates are left as they were.
#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, user_id: i64, reminder_id: i64) -> Result<bool> {
    if access::owned_reminder(db, user_id, reminder_id).await?.is_none() {
        return Ok(false);
    }

    let result = Reminder::update_many()
        .col_expr(reminder::Column::IsActive, Expr::value(false))
        .filter(reminder::Column::Id.eq(reminder_id))
        .filter(reminder::Column::IsActive.eq(true))
        .exec(db)
        .await?;

    let deleted = result.rows_affected > 0;
    if deleted {
        info!(reminder_id, "deactivated reminder");
    }
    Ok(deleted)
}

/// Lists a plant's active reminders, soonest due first.
///
/// Returns `None` when the plant is not visible to `user_id`.
#[instrument(skip(db))]
pub async fn list_for_plant(
    db: &DatabaseConnection,
    user_id: i64,
    plant_id: i64,
) -> Result<Option<Vec<reminder::Model>>> {
    if access::owned_plant(db, user_id, plant_id).await?.is_none() {
        return Ok(None);
    }

    let reminders = Reminder::find()
        .filter(reminder::Column::UserPlantId.eq(plant_id))
        .filter(reminder::Column::IsActive.eq(true))
        .order_by_asc(reminder::Column::NextReminder)
        .order_by_asc(reminder::Column::Id)
        .all(db)
        .await?;

    Ok(Some(reminders))
}

/// Lists every active reminder on the user's plants due within
/// `today..=today + window_days`, soonest first.
#[instrument(skip(db))]
pub async fn list_upcoming(
    db: &DatabaseConnection,
    user_id: i64,
    window_days: u32,
    today: NaiveDate,
) -> Result<Vec<UpcomingReminder>> {
    let window_end = today
        .checked_add_days(Days::new(u64::from(window_days)))
        .ok_or_else(|| Error::validation("days", "window is out of range"))?;

    let rows = Reminder::find()
        .filter(reminder::Column::IsActive.eq(true))
        .filter(reminder::Column::NextReminder.between(today, window_end))
        .filter(user_plant::Column::UserId.eq(user_id))
        .filter(user_plant::Column::IsDeleted.eq(false))
        .order_by_asc(reminder::Column::NextReminder)
        .order_by_asc(reminder::Column::Id)
        .find_also_related(UserPlant)
        .all(db)
        .await?;

    let type_ids: Vec<i64> = rows
        .iter()
        .filter_map(|(_, plant)| plant.as_ref().map(|p| p.plant_type_id))
        .collect();
    let plant_types: HashMap<i64, plant_type::Model> = if type_ids.is_empty() {
        HashMap::new()
    } else {
        PlantType::find()
            .filter(plant_type::Column::Id.is_in(type_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect()
    };

    let upcoming: Vec<UpcomingReminder> = rows
        .into_iter()
        .filter_map(|(reminder, plant)| {
            let plant = plant?;
            let plant_type = plant_types.get(&plant.plant_type_id)?;
            Some(UpcomingReminder {
                reminder,
                plant_id: plant.id,
                plant_name: plant_type.cultivar.clone(),
                plant_species: plant_type.species.clone(),
            })
        })
        .collect();

    debug!("Found {} upcoming reminders", upcoming.len());
    Ok(upcoming)
}
