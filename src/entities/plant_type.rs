//! Plant type entity - The shared catalog of cultivar + species pairs.
//!
//! Rows are created lazily the first time any user adds a plant of that kind and
//! are never updated afterwards. Several users' plants may point at the same row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog entry stored in `all_plants`
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "all_plants")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the catalog entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Variety name, e.g. "Roma"
    pub cultivar: String,
    /// Species name, e.g. "Tomato"
    pub species: String,
    /// Soft delete flag
    pub is_deleted: bool,
}

/// A catalog entry is referenced by many user plants
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One plant type has many user plants
    #[sea_orm(has_many = "super::user_plant::Entity")]
    UserPlants,
}

impl Related<super::user_plant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserPlants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
