//! Health log - timestamped remarks about a plant's condition.
//!
//! Remarks are appended with the current time, which never changes afterwards.
//! Only the text can be edited, and deleting a remark removes the row.

use crate::{
    core::access,
    entities::{HealthRemark, health_remark},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Outcome of asking for a plant's most recent remark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatestRemark {
    /// The plant is missing, deleted, or belongs to someone else
    PlantNotFound,
    /// The plant is visible but has no remarks yet
    NoRemark,
    /// The newest remark
    Remark(health_remark::Model),
}

fn checked_text(remarks: &str) -> Result<String> {
    let trimmed = remarks.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("remarks", "remarks cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Lists a plant's remarks, newest first. `None` if the plant is not visible.
#[instrument(skip(db))]
pub async fn list(
    db: &DatabaseConnection,
    user_id: i64,
    plant_id: i64,
) -> Result<Option<Vec<health_remark::Model>>> {
    if access::owned_plant(db, user_id, plant_id).await?.is_none() {
        return Ok(None);
    }

    let remarks = HealthRemark::find()
        .filter(health_remark::Column::UserPlantId.eq(plant_id))
        .order_by_desc(health_remark::Column::CreatedAt)
        .order_by_desc(health_remark::Column::Id)
        .all(db)
        .await?;

    Ok(Some(remarks))
}

/// Appends a remark to a plant. `None` if the plant is not visible.
///
/// # Errors
/// Returns a validation error if `remarks` is blank.
#[instrument(skip(db, remarks))]
pub async fn add(
    db: &DatabaseConnection,
    user_id: i64,
    plant_id: i64,
    remarks: &str,
) -> Result<Option<health_remark::Model>> {
    let remarks = checked_text(remarks)?;

    if access::owned_plant(db, user_id, plant_id).await?.is_none() {
        return Ok(None);
    }

    let remark = health_remark::ActiveModel {
        user_plant_id: Set(plant_id),
        remarks: Set(remarks),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(remark_id = remark.id, "added health remark");
    Ok(Some(remark))
}

/// Returns the newest remark for a plant, distinguishing a plant with no remarks
/// from a plant the user cannot see.
#[instrument(skip(db))]
pub async fn latest(db: &DatabaseConnection, user_id: i64, plant_id: i64) -> Result<LatestRemark> {
    if access::owned_plant(db, user_id, plant_id).await?.is_none() {
        return Ok(LatestRemark::PlantNotFound);
    }

    let newest = HealthRemark::find()
        .filter(health_remark::Column::UserPlantId.eq(plant_id))
        .order_by_desc(health_remark::Column::CreatedAt)
        .order_by_desc(health_remark::Column::Id)
        .one(db)
        .await?;

    Ok(newest.map_or(LatestRemark::NoRemark, LatestRemark::Remark))
}

/// Replaces a remark's text, keeping its timestamp. `None` if not visible.
///
/// # Errors
/// Returns a validation error if `remarks` is blank.
#[instrument(skip(db, remarks))]
pub async fn update(
    db: &DatabaseConnection,
    user_id: i64,
    remark_id: i64,
    remarks: &str,
) -> Result<Option<health_remark::Model>> {
    let remarks = checked_text(remarks)?;

    let Some(existing) = access::owned_remark(db, user_id, remark_id).await? else {
        return Ok(None);
    };

    let mut remark: health_remark::ActiveModel = existing.into();
    remark.remarks = Set(remarks);
    let updated = remark.update(db).await?;

    info!(remark_id, "updated health remark");
    Ok(Some(updated))
}

/// Permanently removes a remark. Returns `false` if nothing visible matched.
#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, user_id: i64, remark_id: i64) -> Result<bool> {
    let Some(existing) = access::owned_remark(db, user_id, remark_id).await? else {
        return Ok(false);
    };

    let result = existing.delete(db).await?;
    let deleted = result.rows_affected > 0;
    if deleted {
        info!(remark_id, "deleted health remark");
    }
    Ok(deleted)
}
