//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod health_remark;
pub mod plant_type;
pub mod reminder;
pub mod user_plant;

// Re-export specific types to avoid conflicts
pub use health_remark::{
    Column as HealthRemarkColumn, Entity as HealthRemark, Model as HealthRemarkModel,
};
pub use plant_type::{Column as PlantTypeColumn, Entity as PlantType, Model as PlantTypeModel};
pub use reminder::{
    Column as ReminderColumn, Entity as Reminder, Model as ReminderModel, ReminderType,
};
pub use user_plant::{Column as UserPlantColumn, Entity as UserPlant, Model as UserPlantModel};
