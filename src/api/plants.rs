//! Plant registry endpoints.
//!
//! Adding and editing a plant takes a multipart form so a photo can ride along
//! with the text fields.

use super::{ApiError, AppState, auth::current_user};
use crate::{
    core::plant::{self, PlantInput, PlantView},
    errors::Error,
};
use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::NaiveDate;
use tracing::debug;

const PLANT_NOT_FOUND: &str = "Plant not found";

/// A photo as it arrived in the form
#[derive(Debug)]
struct UploadedPhoto {
    content_type: String,
    bytes: Bytes,
}

/// Raw text fields of the add/edit plant form
#[derive(Debug, Default)]
struct PlantForm {
    cultivar: Option<String>,
    species: Option<String>,
    planting_time: Option<String>,
    est_cropping_days: Option<String>,
    photo: Option<UploadedPhoto>,
}

impl PlantForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };
            match name.as_str() {
                "cultivar" => form.cultivar = Some(field.text().await?),
                "species" => form.species = Some(field.text().await?),
                "plantingTime" => form.planting_time = Some(field.text().await?),
                "estCroppingDays" => form.est_cropping_days = Some(field.text().await?),
                "photo" => {
                    let content_type = field.content_type().unwrap_or_default().to_string();
                    let bytes = field.bytes().await?;
                    // Browsers send an empty part when no file was picked
                    if !bytes.is_empty() {
                        form.photo = Some(UploadedPhoto {
                            content_type,
                            bytes,
                        });
                    }
                }
                other => debug!("Ignoring unknown form field {}", other),
            }
        }
        Ok(form)
    }

    /// Validates the text fields, leaving the photo to be stored separately.
    ///
    /// Runs every check the registry would, so a rejected form never gets its
    /// photo written to the store.
    fn into_input(self) -> Result<(PlantInput, Option<UploadedPhoto>), ApiError> {
        let cultivar = required(self.cultivar, "cultivar")?;
        let species = required(self.species, "species")?;
        let planting_time = required(self.planting_time, "plantingTime")?;
        let planting_time = NaiveDate::parse_from_str(&planting_time, "%Y-%m-%d").map_err(|_| {
            ApiError::validation("plantingTime", "plantingTime must be a date (YYYY-MM-DD)")
        })?;

        let est_cropping_days = match self.est_cropping_days.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<i32>().map_err(|_| {
                ApiError::validation("estCroppingDays", "estCroppingDays must be a whole number")
            })?),
        };

        let input = PlantInput {
            cultivar,
            species,
            planting_time,
            est_cropping_days,
            photo_url: None,
        };
        input.validate()?;
        Ok((input, self.photo))
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation(field, format!("{field} is required")))
}

/// Hands the photo to the configured store and returns its URL.
async fn store_photo(
    state: &AppState,
    photo: Option<UploadedPhoto>,
) -> Result<Option<String>, ApiError> {
    let Some(photo) = photo else {
        return Ok(None);
    };
    if !photo.content_type.starts_with("image/") {
        return Err(ApiError::validation("photo", "photo must be an image"));
    }
    let Some(store) = state.photos.clone() else {
        return Err(ApiError::validation("photo", "photo uploads are not enabled"));
    };

    let url = tokio::task::spawn_blocking(move || store.save(&photo.content_type, &photo.bytes))
        .await
        .map_err(Error::from)??;
    Ok(Some(url))
}

/// GET /api/plants
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<PlantView>>, ApiError> {
    let user_id = current_user(&headers)?;
    Ok(Json(plant::list(&state.db, user_id).await?))
}

/// GET /api/plants/:id
pub async fn get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(plant_id): Path<i64>,
) -> Result<Json<PlantView>, ApiError> {
    let user_id = current_user(&headers)?;
    plant::get(&state.db, user_id, plant_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(PLANT_NOT_FOUND))
}

/// POST /api/plants
pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = current_user(&headers)?;
    let (mut input, photo) = PlantForm::read(multipart).await?.into_input()?;
    input.photo_url = store_photo(&state, photo).await?;

    let view = plant::add(&state.db, user_id, input).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// PUT /api/plants/:id
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(plant_id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<PlantView>, ApiError> {
    let user_id = current_user(&headers)?;
    let (mut input, photo) = PlantForm::read(multipart).await?.into_input()?;

    if photo.is_some() && plant::get(&state.db, user_id, plant_id).await?.is_none() {
        return Err(ApiError::NotFound(PLANT_NOT_FOUND));
    }
    input.photo_url = store_photo(&state, photo).await?;

    plant::update(&state.db, user_id, plant_id, input)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(PLANT_NOT_FOUND))
}

/// DELETE /api/plants/:id
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(plant_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let user_id = current_user(&headers)?;
    if plant::soft_delete(&state.db, user_id, plant_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(PLANT_NOT_FOUND))
    }
}
