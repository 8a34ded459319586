//! Ownership checks shared by every per-plant operation.
//!
//! Each lookup joins back to `user_plants` and requires both that the requesting
//! user owns the plant and that the plant is not soft-deleted. A row that does not
//! exist and a row owned by someone else both come back as `None`, so callers can
//! never tell the two apart.

use crate::{
    entities::{HealthRemark, Reminder, UserPlant, health_remark, reminder, user_plant},
    errors::Result,
};
use sea_orm::{JoinType, QuerySelect, RelationTrait, prelude::*};
use tracing::debug;

/// Returns the plant if `user_id` owns it and it has not been deleted.
pub async fn owned_plant<C>(db: &C, user_id: i64, plant_id: i64) -> Result<Option<user_plant::Model>>
where
    C: ConnectionTrait,
{
    let plant = UserPlant::find_by_id(plant_id)
        .filter(user_plant::Column::UserId.eq(user_id))
        .filter(user_plant::Column::IsDeleted.eq(false))
        .one(db)
        .await?;

    if plant.is_none() {
        debug!(user_id, plant_id, "plant not visible to user");
    }
    Ok(plant)
}

/// Returns the active reminder if it hangs off a plant visible to `user_id`.
pub async fn owned_reminder<C>(
    db: &C,
    user_id: i64,
    reminder_id: i64,
) -> Result<Option<reminder::Model>>
where
    C: ConnectionTrait,
{
    let found = Reminder::find_by_id(reminder_id)
        .join(JoinType::InnerJoin, reminder::Relation::UserPlant.def())
        .filter(reminder::Column::IsActive.eq(true))
        .filter(user_plant::Column::UserId.eq(user_id))
        .filter(user_plant::Column::IsDeleted.eq(false))
        .one(db)
        .await?;

    if found.is_none() {
        debug!(user_id, reminder_id, "reminder not visible to user");
    }
    Ok(found)
}

/// Returns the health remark if it belongs to a plant visible to `user_id`.
pub async fn owned_remark<C>(
    db: &C,
    user_id: i64,
    remark_id: i64,
) -> Result<Option<health_remark::Model>>
where
    C: ConnectionTrait,
{
    let found = HealthRemark::find_by_id(remark_id)
        .join(JoinType::InnerJoin, health_remark::Relation::UserPlant.def())
        .filter(user_plant::Column::UserId.eq(user_id))
        .filter(user_plant::Column::IsDeleted.eq(false))
        .one(db)
        .await?;

    if found.is_none() {
        debug!(user_id, remark_id, "health remark not visible to user");
    }
    Ok(found)
}
