//! Reminder endpoints.

use super::{ApiError, AppState, auth::current_user};
use crate::{
    core::reminder::{self, UpcomingReminder},
    entities::ReminderType,
    entities::reminder as reminder_entity,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use chrono::NaiveDate;
use serde::Deserialize;

const PLANT_NOT_FOUND: &str = "Plant not found";
const REMINDER_NOT_FOUND: &str = "Reminder not found";

/// Body of POST /api/plants/:id/reminders.
///
/// Every field is optional at the parsing stage so that missing values are
/// reported per field rather than as a generic body rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReminderBody {
    #[serde(rename = "type")]
    reminder_type: Option<String>,
    interval_days: Option<i64>,
    start_date: Option<String>,
    notes: Option<String>,
}

struct ReminderRequest {
    reminder_type: ReminderType,
    interval_days: i32,
    start_date: NaiveDate,
    notes: Option<String>,
}

impl SaveReminderBody {
    fn validate(self) -> Result<ReminderRequest, ApiError> {
        let reminder_type = self
            .reminder_type
            .as_deref()
            .and_then(ReminderType::parse)
            .ok_or_else(|| {
                ApiError::validation(
                    "type",
                    "type must be one of watering, fertilizing, harvesting, other",
                )
            })?;

        let interval_days = self
            .interval_days
            .filter(|days| *days >= 1)
            .and_then(|days| i32::try_from(days).ok())
            .ok_or_else(|| {
                ApiError::validation("intervalDays", "intervalDays must be a positive number")
            })?;

        let start_date = self
            .start_date
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
            .ok_or_else(|| {
                ApiError::validation("startDate", "startDate must be a date (YYYY-MM-DD)")
            })?;

        let notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(ReminderRequest {
            reminder_type,
            interval_days,
            start_date,
            notes,
        })
    }
}

/// Query string of GET /api/reminders/upcoming
#[derive(Debug, Default, Deserialize)]
pub struct UpcomingParams {
    days: Option<u32>,
}

/// GET /api/plants/:id/reminders
pub async fn list_for_plant(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(plant_id): Path<i64>,
) -> Result<Json<Vec<reminder_entity::Model>>, ApiError> {
    let user_id = current_user(&headers)?;
    reminder::list_for_plant(&state.db, user_id, plant_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(PLANT_NOT_FOUND))
}

/// POST /api/plants/:id/reminders
pub async fn save(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(plant_id): Path<i64>,
    Json(body): Json<SaveReminderBody>,
) -> Result<Json<reminder_entity::Model>, ApiError> {
    let user_id = current_user(&headers)?;
    let request = body.validate()?;

    reminder::save(
        &state.db,
        user_id,
        plant_id,
        request.reminder_type,
        request.interval_days,
        request.start_date,
        request.notes,
    )
    .await?
    .map(Json)
    .ok_or(ApiError::NotFound(PLANT_NOT_FOUND))
}

/// PUT /api/reminders/:id/complete
pub async fn complete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(reminder_id): Path<i64>,
) -> Result<Json<reminder_entity::Model>, ApiError> {
    let user_id = current_user(&headers)?;
    let today = (state.today)();
    reminder::complete(&state.db, user_id, reminder_id, today)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(REMINDER_NOT_FOUND))
}

/// DELETE /api/reminders/:id
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(reminder_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let user_id = current_user(&headers)?;
    if reminder::delete(&state.db, user_id, reminder_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(REMINDER_NOT_FOUND))
    }
}

/// GET /api/reminders/upcoming
pub async fn upcoming(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<UpcomingParams>,
) -> Result<Json<Vec<UpcomingReminder>>, ApiError> {
    let user_id = current_user(&headers)?;
    let window = params.days.unwrap_or(state.upcoming_window_days);
    let today = (state.today)();
    Ok(Json(
        reminder::list_upcoming(&state.db, user_id, window, today).await?,
    ))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn body(kind: &str, interval: i64, start: &str) -> SaveReminderBody {
        SaveReminderBody {
            reminder_type: Some(kind.to_string()),
            interval_days: Some(interval),
            start_date: Some(start.to_string()),
            notes: Some("   ".to_string()),
        }
    }

    #[test]
    fn test_validate_accepts_good_body() {
        let request = body("watering", 3, "2025-05-01").validate().unwrap();
        assert_eq!(request.reminder_type, ReminderType::Watering);
        assert_eq!(request.interval_days, 3);
        assert_eq!(
            request.start_date,
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
        );
        assert_eq!(request.notes, None);
    }

    #[test]
    fn test_validate_rejects_each_field() {
        assert!(matches!(
            body("pruning", 3, "2025-05-01").validate(),
            Err(ApiError::Validation { field: "type", .. })
        ));
        assert!(matches!(
            body("watering", 0, "2025-05-01").validate(),
            Err(ApiError::Validation {
                field: "intervalDays",
                ..
            })
        ));
        assert!(matches!(
            body("watering", i64::from(i32::MAX) + 1, "2025-05-01").validate(),
            Err(ApiError::Validation {
                field: "intervalDays",
                ..
            })
        ));
        assert!(matches!(
            body("watering", 3, "tomorrow").validate(),
            Err(ApiError::Validation {
                field: "startDate",
                ..
            })
        ));
        assert!(matches!(
            SaveReminderBody::default().validate(),
            Err(ApiError::Validation { field: "type", .. })
        ));
    }
}
