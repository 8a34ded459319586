//! User plant registry - the plants each user is growing.
//!
//! Every read and write is scoped to the requesting user and skips soft-deleted
//! rows. `add` and `update` resolve the catalog entry and write the plant inside a
//! single database transaction, rolling it back explicitly on any failure so a
//! catalog row never outlives the plant write that created it.

use crate::{
    core::{access, catalog},
    entities::{PlantType, UserPlant, plant_type, user_plant},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    DatabaseTransaction, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// A user plant joined with its catalog entry, as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantView {
    /// User plant id
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Catalog entry id
    pub plant_type_id: i64,
    /// Cultivar from the catalog entry
    pub cultivar: String,
    /// Species from the catalog entry
    pub species: String,
    /// Planting date
    pub planting_time: NaiveDate,
    /// Estimated days until cropping
    pub est_cropping_days: Option<i32>,
    /// Photo URL, if any
    pub photo_url: Option<String>,
}

impl PlantView {
    fn new(plant: user_plant::Model, cultivar: String, species: String) -> Self {
        Self {
            id: plant.id,
            user_id: plant.user_id,
            plant_type_id: plant.plant_type_id,
            cultivar,
            species,
            planting_time: plant.planting_time,
            est_cropping_days: plant.est_cropping_days,
            photo_url: plant.photo_url,
        }
    }

    fn from_joined(plant: user_plant::Model, plant_type: Option<plant_type::Model>) -> Option<Self> {
        let Some(plant_type) = plant_type else {
            warn!(plant_id = plant.id, "plant references a missing catalog entry");
            return None;
        };
        Some(Self::new(plant, plant_type.cultivar, plant_type.species))
    }
}

/// Fields supplied when adding or updating a plant.
#[derive(Debug, Clone)]
pub struct PlantInput {
    /// Cultivar name, matched exactly against the catalog
    pub cultivar: String,
    /// Species name, matched exactly against the catalog
    pub species: String,
    /// Planting date
    pub planting_time: NaiveDate,
    /// Estimated days until cropping
    pub est_cropping_days: Option<i32>,
    /// New photo URL. On update, `None` or an empty string keeps the old photo.
    pub photo_url: Option<String>,
}

impl PlantInput {
    /// Checks the fields the catalog lookup does not.
    ///
    /// # Errors
    /// Returns a validation error for negative cropping days.
    pub fn validate(&self) -> Result<()> {
        if matches!(self.est_cropping_days, Some(days) if days < 0) {
            return Err(Error::validation(
                "estCroppingDays",
                "estimated cropping days cannot be negative",
            ));
        }
        Ok(())
    }

    fn new_photo(&self) -> Option<String> {
        self.photo_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(ToString::to_string)
    }
}

/// Lists the user's plants, newest planting first.
#[instrument(skip(db))]
pub async fn list(db: &DatabaseConnection, user_id: i64) -> Result<Vec<PlantView>> {
    let rows = UserPlant::find()
        .filter(user_plant::Column::UserId.eq(user_id))
        .filter(user_plant::Column::IsDeleted.eq(false))
        .order_by_desc(user_plant::Column::PlantingTime)
        .order_by_desc(user_plant::Column::Id)
        .find_also_related(PlantType)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(plant, plant_type)| PlantView::from_joined(plant, plant_type))
        .collect())
}

/// Fetches one plant. Missing, deleted and foreign plants all yield `None`.
#[instrument(skip(db))]
pub async fn get(db: &DatabaseConnection, user_id: i64, plant_id: i64) -> Result<Option<PlantView>> {
    let row = UserPlant::find_by_id(plant_id)
        .filter(user_plant::Column::UserId.eq(user_id))
        .filter(user_plant::Column::IsDeleted.eq(false))
        .find_also_related(PlantType)
        .one(db)
        .await?;

    Ok(row.and_then(|(plant, plant_type)| PlantView::from_joined(plant, plant_type)))
}

/// Adds a plant for `user_id`, creating the catalog entry if needed.
///
/// # Errors
/// Returns a validation error for blank names or negative cropping days. Any
/// failure rolls the whole operation back.
#[instrument(skip(db, input), fields(cultivar = %input.cultivar, species = %input.species))]
pub async fn add(db: &DatabaseConnection, user_id: i64, input: PlantInput) -> Result<PlantView> {
    input.validate()?;

    let txn = db.begin().await?;
    match insert_in(&txn, user_id, input).await {
        Ok(view) => {
            txn.commit().await?;
            info!(plant_id = view.id, "added plant");
            Ok(view)
        }
        Err(e) => {
            rollback(txn).await;
            Err(e)
        }
    }
}

async fn insert_in(txn: &DatabaseTransaction, user_id: i64, input: PlantInput) -> Result<PlantView> {
    let plant_type_id = catalog::find_or_create(txn, &input.cultivar, &input.species).await?;
    let photo_url = input.new_photo();

    let plant = user_plant::ActiveModel {
        user_id: Set(user_id),
        plant_type_id: Set(plant_type_id),
        planting_time: Set(input.planting_time),
        est_cropping_days: Set(input.est_cropping_days),
        photo_url: Set(photo_url),
        is_deleted: Set(false),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    Ok(PlantView::new(plant, input.cultivar, input.species))
}

/// Replaces a plant's catalog entry, dates and (optionally) photo.
///
/// Returns `None` when the plant is not visible to `user_id`; nothing is written
/// in that case, not even a catalog entry.
#[instrument(skip(db, input), fields(cultivar = %input.cultivar, species = %input.species))]
pub async fn update(
    db: &DatabaseConnection,
    user_id: i64,
    plant_id: i64,
    input: PlantInput,
) -> Result<Option<PlantView>> {
    input.validate()?;

    let txn = db.begin().await?;
    match update_in(&txn, user_id, plant_id, input).await {
        Ok(view) => {
            txn.commit().await?;
            if view.is_some() {
                info!(plant_id, "updated plant");
            }
            Ok(view)
        }
        Err(e) => {
            rollback(txn).await;
            Err(e)
        }
    }
}

async fn update_in(
    txn: &DatabaseTransaction,
    user_id: i64,
    plant_id: i64,
    input: PlantInput,
) -> Result<Option<PlantView>> {
    let Some(existing) = access::owned_plant(txn, user_id, plant_id).await? else {
        return Ok(None);
    };

    let plant_type_id = catalog::find_or_create(txn, &input.cultivar, &input.species).await?;
    let new_photo = input.new_photo();

    let mut plant: user_plant::ActiveModel = existing.into();
    plant.plant_type_id = Set(plant_type_id);
    plant.planting_time = Set(input.planting_time);
    plant.est_cropping_days = Set(input.est_cropping_days);
    if let Some(url) = new_photo {
        plant.photo_url = Set(Some(url));
    }
    let updated = plant.update(txn).await?;

    Ok(Some(PlantView::new(updated, input.cultivar, input.species)))
}

/// Soft-deletes a plant. Returns `false` if nothing visible to `user_id` matched.
///
/// Reminders and health remarks are left untouched; they simply become
/// unreachable along with their plant.
#[instrument(skip(db))]
pub async fn soft_delete(db: &DatabaseConnection, user_id: i64, plant_id: i64) -> Result<bool> {
    let result = UserPlant::update_many()
        .col_expr(user_plant::Column::IsDeleted, Expr::value(true))
        .filter(user_plant::Column::Id.eq(plant_id))
        .filter(user_plant::Column::UserId.eq(user_id))
        .filter(user_plant::Column::IsDeleted.eq(false))
        .exec(db)
        .await?;

    let deleted = result.rows_affected > 0;
    if deleted {
        info!(plant_id, "soft-deleted plant");
    }
    Ok(deleted)
}

async fn rollback(txn: DatabaseTransaction) {
    if let Err(e) = txn.rollback().await {
        warn!("Failed to roll back plant transaction: {}", e);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{ConnectionTrait, PaginatorTrait};

    #[tokio::test]
    async fn test_add_plant_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let plant = create_test_plant(&db, OWNER).await?;
        assert_eq!(plant.user_id, OWNER);
        assert_eq!(plant.cultivar, "Roma");
        assert_eq!(plant.species, "Tomato");
        assert_eq!(plant.planting_time, date(2025, 3, 1));
        assert_eq!(plant.est_cropping_days, Some(60));
        assert!(plant.photo_url.is_none());

        let fetched = get(&db, OWNER, plant.id).await?.unwrap();
        assert_eq!(fetched, plant);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_plant_validation_leaves_nothing_behind() -> Result<()> {
        let db = setup_test_db().await?;

        let mut input = plant_input("Roma", "Tomato", date(2025, 3, 1));
        input.est_cropping_days = Some(-1);
        let result = add(&db, OWNER, input).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = add(&db, OWNER, plant_input("Roma", " ", date(2025, 3, 1))).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        assert_eq!(PlantType::find().count(&db).await?, 0);
        assert_eq!(UserPlant::find().count(&db).await?, 0);

        Ok(())
    }

    /// Makes every write to `user_plants` fail after the catalog step has run.
    async fn reject_plant_writes(db: &DatabaseConnection) -> Result<()> {
        db.execute_unprepared(
            "CREATE TRIGGER reject_plant_insert BEFORE INSERT ON user_plants \
             BEGIN SELECT RAISE(ABORT, 'plant writes disabled'); END;",
        )
        .await?;
        db.execute_unprepared(
            "CREATE TRIGGER reject_plant_update BEFORE UPDATE ON user_plants \
             BEGIN SELECT RAISE(ABORT, 'plant writes disabled'); END;",
        )
        .await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_add_rolls_back_catalog_entry_on_failure() -> Result<()> {
        let db = setup_test_db().await?;
        reject_plant_writes(&db).await?;

        let result = add(&db, OWNER, plant_input("Roma", "Tomato", date(2025, 3, 1))).await;
        assert!(matches!(result, Err(Error::Database(_))));

        assert_eq!(PlantType::find().count(&db).await?, 0);
        assert_eq!(UserPlant::find().count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_rolls_back_catalog_entry_on_failure() -> Result<()> {
        let db = setup_test_db().await?;
        let plant = create_test_plant(&db, OWNER).await?;
        reject_plant_writes(&db).await?;

        let result = update(
            &db,
            OWNER,
            plant.id,
            plant_input("San Marzano", "Tomato", date(2025, 3, 10)),
        )
        .await;
        assert!(matches!(result, Err(Error::Database(_))));

        // Only the original entry remains and the plant still points at it
        assert_eq!(PlantType::find().count(&db).await?, 1);
        assert_eq!(get(&db, OWNER, plant.id).await?.unwrap(), plant);

        Ok(())
    }

    #[tokio::test]
    async fn test_catalog_entry_shared_across_users() -> Result<()> {
        let db = setup_test_db().await?;

        let mine = create_test_plant(&db, OWNER).await?;
        let another_of_mine = create_test_plant(&db, OWNER).await?;
        let theirs = create_test_plant(&db, STRANGER).await?;

        assert_eq!(mine.plant_type_id, another_of_mine.plant_type_id);
        assert_eq!(mine.plant_type_id, theirs.plant_type_id);
        assert_eq!(PlantType::find().count(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_orders_by_planting_time_desc() -> Result<()> {
        let db = setup_test_db().await?;

        let early = create_custom_plant(&db, OWNER, "Roma", "Tomato", date(2025, 2, 1)).await?;
        let late = create_custom_plant(&db, OWNER, "Genovese", "Basil", date(2025, 4, 1)).await?;
        let middle = create_custom_plant(&db, OWNER, "Nantes", "Carrot", date(2025, 3, 1)).await?;
        create_custom_plant(&db, STRANGER, "Cherry", "Tomato", date(2025, 5, 1)).await?;

        let plants = list(&db, OWNER).await?;
        let ids: Vec<i64> = plants.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![late.id, middle.id, early.id]);
        assert_eq!(plants[0].cultivar, "Genovese");
        assert_eq!(plants[0].species, "Basil");

        Ok(())
    }

    #[tokio::test]
    async fn test_other_user_cannot_touch_plant() -> Result<()> {
        let db = setup_test_db().await?;
        let plant = create_test_plant(&db, OWNER).await?;

        assert!(get(&db, STRANGER, plant.id).await?.is_none());
        let updated = update(
            &db,
            STRANGER,
            plant.id,
            plant_input("Hijacked", "Weed", date(2025, 1, 1)),
        )
        .await?;
        assert!(updated.is_none());
        assert!(!soft_delete(&db, STRANGER, plant.id).await?);

        // The failed update must not have created a catalog entry either
        assert_eq!(PlantType::find().count(&db).await?, 1);
        assert_eq!(get(&db, OWNER, plant.id).await?.unwrap(), plant);

        Ok(())
    }

    #[tokio::test]
    async fn test_soft_delete_hides_plant() -> Result<()> {
        let db = setup_test_db().await?;
        let plant = create_test_plant(&db, OWNER).await?;

        assert!(soft_delete(&db, OWNER, plant.id).await?);
        assert!(get(&db, OWNER, plant.id).await?.is_none());
        assert!(list(&db, OWNER).await?.is_empty());

        // Deleting again finds nothing
        assert!(!soft_delete(&db, OWNER, plant.id).await?);

        // The row itself is still stored
        let stored = UserPlant::find_by_id(plant.id).one(&db).await?.unwrap();
        assert!(stored.is_deleted);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_repoints_catalog_entry() -> Result<()> {
        let db = setup_test_db().await?;
        let plant = create_test_plant(&db, OWNER).await?;

        let mut input = plant_input("San Marzano", "Tomato", date(2025, 3, 10));
        input.est_cropping_days = Some(75);
        let updated = update(&db, OWNER, plant.id, input).await?.unwrap();

        assert_ne!(updated.plant_type_id, plant.plant_type_id);
        assert_eq!(updated.cultivar, "San Marzano");
        assert_eq!(updated.planting_time, date(2025, 3, 10));
        assert_eq!(updated.est_cropping_days, Some(75));
        assert_eq!(get(&db, OWNER, plant.id).await?.unwrap(), updated);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_keeps_photo_unless_replaced() -> Result<()> {
        let db = setup_test_db().await?;

        let mut input = plant_input("Roma", "Tomato", date(2025, 3, 1));
        input.photo_url = Some("/uploads/first.jpg".to_string());
        let plant = add(&db, OWNER, input).await?;
        assert_eq!(plant.photo_url.as_deref(), Some("/uploads/first.jpg"));

        // No photo supplied
        let kept = update(&db, OWNER, plant.id, plant_input("Roma", "Tomato", date(2025, 3, 2)))
            .await?
            .unwrap();
        assert_eq!(kept.photo_url.as_deref(), Some("/uploads/first.jpg"));

        // Empty photo counts as not supplied
        let mut input = plant_input("Roma", "Tomato", date(2025, 3, 2));
        input.photo_url = Some(String::new());
        let kept = update(&db, OWNER, plant.id, input).await?.unwrap();
        assert_eq!(kept.photo_url.as_deref(), Some("/uploads/first.jpg"));

        // New photo replaces the old one
        let mut input = plant_input("Roma", "Tomato", date(2025, 3, 2));
        input.photo_url = Some("/uploads/second.jpg".to_string());
        let replaced = update(&db, OWNER, plant.id, input).await?.unwrap();
        assert_eq!(replaced.photo_url.as_deref(), Some("/uploads/second.jpg"));

        Ok(())
    }
}
