//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. Foreign keys from reminders and health remarks to `user_plants` are
//! `ON DELETE CASCADE`; the application itself only ever soft-deletes plants, so
//! that cascade is reached only by administrative hard deletes.

use crate::entities::{HealthRemark, PlantType, Reminder, UserPlant};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Fallback used when neither the settings file nor the environment name a database.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/garden_buddy.sqlite?mode=rwc";

/// Establishes a connection to the database at `database_url`.
///
/// For file-backed `SQLite` URLs the parent directory is created first, since
/// `mode=rwc` creates the file but not the folders leading to it.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(parent) = sqlite_parent_dir(database_url) {
        std::fs::create_dir_all(&parent)?;
    }
    debug!("Connecting to database at {}", database_url);
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates every table (and the indexes declared on the entities) if missing.
///
/// Parents are created before children so foreign keys resolve.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table_for(db, PlantType).await?;
    create_table_for(db, UserPlant).await?;
    create_table_for(db, Reminder).await?;
    create_table_for(db, HealthRemark).await?;

    info!("Database schema is ready");
    Ok(())
}

/// Directory holding the database file, if `database_url` names a file on disk.
fn sqlite_parent_dir(database_url: &str) -> Option<PathBuf> {
    let rest = database_url.strip_prefix("sqlite:")?;
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

async fn create_table_for<E>(db: &DatabaseConnection, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(builder.build(&table)).await?;

    for mut index in schema.create_index_from_entity(entity) {
        index.if_not_exists();
        db.execute(builder.build(&index)).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        health_remark::Model as HealthRemarkModel, plant_type::Model as PlantTypeModel,
        reminder::Model as ReminderModel, user_plant::Model as UserPlantModel,
    };
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<PlantTypeModel> = PlantType::find().limit(1).all(&db).await?;
        let _: Vec<UserPlantModel> = UserPlant::find().limit(1).all(&db).await?;
        let _: Vec<ReminderModel> = Reminder::find().limit(1).all(&db).await?;
        let _: Vec<HealthRemarkModel> = HealthRemark::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[test]
    fn test_sqlite_parent_dir() {
        assert_eq!(
            sqlite_parent_dir(DEFAULT_DATABASE_URL),
            Some(PathBuf::from("data"))
        );
        assert_eq!(sqlite_parent_dir("sqlite::memory:"), None);
        assert_eq!(sqlite_parent_dir("sqlite://garden.sqlite?mode=rwc"), None);
        assert_eq!(sqlite_parent_dir("postgres://localhost/garden"), None);
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
