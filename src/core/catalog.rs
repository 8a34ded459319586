//! Plant catalog - the shared registry of cultivar + species pairs.
//!
//! Entries are looked up by exact, case-sensitive match on both fields and created
//! on first use. There is no unique constraint behind this: two concurrent
//! first-time inserts of the same pair can both succeed and leave a duplicate
//! entry. Catalog rows are informational, so a duplicate is harmless.

use crate::{
    entities::{PlantType, plant_type},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info, instrument};

/// Returns the id of the active catalog entry for `(cultivar, species)`,
/// inserting one if none exists.
///
/// Runs on whatever connection it is handed, so the plant registry can call it
/// inside its own transaction.
///
/// # Errors
/// Returns a validation error if either field is blank, or a database error.
#[instrument(skip(db))]
pub async fn find_or_create<C>(db: &C, cultivar: &str, species: &str) -> Result<i64>
where
    C: ConnectionTrait,
{
    if cultivar.trim().is_empty() {
        return Err(Error::validation("cultivar", "cultivar cannot be empty"));
    }
    if species.trim().is_empty() {
        return Err(Error::validation("species", "species cannot be empty"));
    }

    if let Some(existing) = find_active(db, cultivar, species).await? {
        debug!(plant_type_id = existing.id, "reusing catalog entry");
        return Ok(existing.id);
    }

    let entry = plant_type::ActiveModel {
        cultivar: Set(cultivar.to_string()),
        species: Set(species.to_string()),
        is_deleted: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(plant_type_id = entry.id, "created catalog entry");
    Ok(entry.id)
}

/// Finds the active catalog entry matching both fields exactly.
///
/// When duplicates exist the oldest one wins, so repeated lookups are stable.
pub async fn find_active<C>(
    db: &C,
    cultivar: &str,
    species: &str,
) -> Result<Option<plant_type::Model>>
where
    C: ConnectionTrait,
{
    PlantType::find()
        .filter(plant_type::Column::Cultivar.eq(cultivar))
        .filter(plant_type::Column::Species.eq(species))
        .filter(plant_type::Column::IsDeleted.eq(false))
        .order_by_asc(plant_type::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_find_or_create_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = find_or_create(&db, "   ", "Tomato").await;
        assert!(matches!(
            result,
            Err(Error::Validation {
                field: "cultivar",
                ..
            })
        ));

        let result = find_or_create(&db, "Roma", "").await;
        assert!(matches!(
            result,
            Err(Error::Validation {
                field: "species",
                ..
            })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_find_or_create_reuses_entry() -> Result<()> {
        let db = setup_test_db().await?;

        let first = find_or_create(&db, "Roma", "Tomato").await?;
        let second = find_or_create(&db, "Roma", "Tomato").await?;
        assert_eq!(first, second);
        assert_eq!(PlantType::find().count(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_find_or_create_is_exact_match() -> Result<()> {
        let db = setup_test_db().await?;

        let roma = find_or_create(&db, "Roma", "Tomato").await?;
        let lower = find_or_create(&db, "roma", "Tomato").await?;
        let padded = find_or_create(&db, "Roma ", "Tomato").await?;
        let other_species = find_or_create(&db, "Roma", "Bean").await?;

        assert_ne!(roma, lower);
        assert_ne!(roma, padded);
        assert_ne!(roma, other_species);
        assert_eq!(PlantType::find().count(&db).await?, 4);

        Ok(())
    }

    #[tokio::test]
    async fn test_soft_deleted_entry_is_not_reused() -> Result<()> {
        let db = setup_test_db().await?;

        let original = find_or_create(&db, "Roma", "Tomato").await?;
        let mut entry: plant_type::ActiveModel = PlantType::find_by_id(original)
            .one(&db)
            .await?
            .ok_or_else(|| Error::validation("id", "missing"))?
            .into();
        entry.is_deleted = Set(true);
        entry.update(&db).await?;

        let replacement = find_or_create(&db, "Roma", "Tomato").await?;
        assert_ne!(original, replacement);

        Ok(())
    }
}
