//! Reminder entity - A recurring care task for one user plant.
//!
//! At most one active reminder of each [`ReminderType`] exists per plant; the
//! scheduler keeps that true by overwriting instead of inserting. Deleting a
//! reminder clears `is_active` and leaves the dates as history.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of care a reminder is for
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum ReminderType {
    /// Watering
    #[sea_orm(string_value = "watering")]
    Watering,
    /// Fertilizing
    #[sea_orm(string_value = "fertilizing")]
    Fertilizing,
    /// Harvesting
    #[sea_orm(string_value = "harvesting")]
    Harvesting,
    /// Anything else the gardener wants to be reminded of
    #[sea_orm(string_value = "other")]
    Other,
}

impl ReminderType {
    /// Parses the lowercase wire name, returning `None` for anything unknown.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "watering" => Some(Self::Watering),
            "fertilizing" => Some(Self::Fertilizing),
            "harvesting" => Some(Self::Harvesting),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Reminder database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plant_reminders")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the reminder
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Plant this reminder belongs to
    pub user_plant_id: i64,
    /// Care type
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub reminder_type: ReminderType,
    /// Date the interval is counted from
    pub start_date: Date,
    /// Whole days between occurrences, at least 1
    pub interval_days: i32,
    /// Next due date
    pub next_reminder: Date,
    /// Date the reminder was last marked done
    pub last_completed: Option<Date>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Soft delete flag - inactive reminders are kept but never listed
    pub is_active: bool,
}

/// Defines relationships between Reminder and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each reminder belongs to one user plant
    #[sea_orm(
        belongs_to = "super::user_plant::Entity",
        from = "Column::UserPlantId",
        to = "super::user_plant::Column::Id",
        on_delete = "Cascade"
    )]
    UserPlant,
}

impl Related<super::user_plant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserPlant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
