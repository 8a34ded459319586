//! Health remark entity - Timestamped notes about a plant's condition.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Health remark database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plant_health")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the remark
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Plant the remark is about
    pub user_plant_id: i64,
    /// Remark text
    pub remarks: String,
    /// When the remark was written; never changes
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `HealthRemark` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each remark belongs to one user plant
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
