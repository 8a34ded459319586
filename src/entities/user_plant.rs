//! User plant entity - One user's ownership record for a plant they are growing.
//!
//! Each row links a user to a catalog entry and carries the planting date, the
//! estimated days until cropping and an optional photo. Deleting a plant only
//! flips `is_deleted`; the row and its reminders and health remarks stay in place.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User plant database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_plants")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the user plant
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    #[sea_orm(indexed)]
    pub user_id: i64,
    /// Catalog entry this plant is an instance of
    pub plant_type_id: i64,
    /// Date the plant was sown or planted out
    pub planting_time: Date,
    /// Estimated days from planting to first harvest
    pub est_cropping_days: Option<i32>,
    /// Public URL of the plant's photo, if one was uploaded
    pub photo_url: Option<String>,
    /// Soft delete flag - if true, the plant is invisible to every read
    pub is_deleted: bool,
}

/// Defines relationships between `UserPlant` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each user plant references one catalog entry
    #[sea_orm(
        belongs_to = "super::plant_type::Entity",
        from = "Column::PlantTypeId",
        to = "super::plant_type::Column::Id"
    )]
    PlantType,
    /// One user plant has many reminders
    #[sea_orm(has_many = "super::reminder::Entity")]
    Reminders,
    /// One user plant has many health remarks
    #[sea_orm(has_many = "super::health_remark::Entity")]
    HealthRemarks,
}

impl Related<super::plant_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlantType.def()
    }
}

impl Related<super::reminder::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reminders.def()
    }
}

impl Related<super::health_remark::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HealthRemarks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
