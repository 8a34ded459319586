//! Shared test utilities for the garden tracker.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test plants with sensible defaults.

#![allow(clippy::expect_used)]

use crate::{
    core::plant::{self, PlantInput, PlantView},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// User that owns the plants in most tests
pub const OWNER: i64 = 1;
/// A second user who should never see `OWNER`'s data
pub const STRANGER: i64 = 2;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a calendar date, panicking on invalid input.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Plant input with no cropping estimate and no photo.
pub fn plant_input(cultivar: &str, species: &str, planting_time: NaiveDate) -> PlantInput {
    PlantInput {
        cultivar: cultivar.to_string(),
        species: species.to_string(),
        planting_time,
        est_cropping_days: None,
        photo_url: None,
    }
}

/// Adds a test plant with sensible defaults.
///
/// # Defaults
/// * cultivar: "Roma"
/// * species: "Tomato"
/// * `planting_time`: 2025-03-01
/// * `est_cropping_days`: 60
pub async fn create_test_plant(db: &DatabaseConnection, user_id: i64) -> Result<PlantView> {
    let mut input = plant_input("Roma", "Tomato", date(2025, 3, 1));
    input.est_cropping_days = Some(60);
    plant::add(db, user_id, input).await
}

/// Adds a test plant with custom names and planting date.
pub async fn create_custom_plant(
    db: &DatabaseConnection,
    user_id: i64,
    cultivar: &str,
    species: &str,
    planting_time: NaiveDate,
) -> Result<PlantView> {
    plant::add(db, user_id, plant_input(cultivar, species, planting_time)).await
}
