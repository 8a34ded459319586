//! Health log endpoints.

use super::{ApiError, AppState, auth::current_user};
use crate::{
    core::health::{self, LatestRemark},
    entities::health_remark,
};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;

const PLANT_NOT_FOUND: &str = "Plant not found";
const NO_REMARKS: &str = "No health remarks found for this plant";
const REMARK_NOT_FOUND: &str = "Health remark not found";

/// Body of the add and edit remark requests
#[derive(Debug, Default, Deserialize)]
pub struct RemarkBody {
    #[serde(default)]
    remarks: String,
}

/// GET /api/plants/:id/health
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(plant_id): Path<i64>,
) -> Result<Json<Vec<health_remark::Model>>, ApiError> {
    let user_id = current_user(&headers)?;
    health::list(&state.db, user_id, plant_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(PLANT_NOT_FOUND))
}

/// POST /api/plants/:id/health
pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(plant_id): Path<i64>,
    Json(body): Json<RemarkBody>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = current_user(&headers)?;
    let remark = health::add(&state.db, user_id, plant_id, &body.remarks)
        .await?
        .ok_or(ApiError::NotFound(PLANT_NOT_FOUND))?;
    Ok((StatusCode::CREATED, Json(remark)))
}

/// GET /api/plants/:id/health/latest
pub async fn latest(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(plant_id): Path<i64>,
) -> Result<Json<health_remark::Model>, ApiError> {
    let user_id = current_user(&headers)?;
    match health::latest(&state.db, user_id, plant_id).await? {
        LatestRemark::Remark(remark) => Ok(Json(remark)),
        LatestRemark::NoRemark => Err(ApiError::NotFound(NO_REMARKS)),
        LatestRemark::PlantNotFound => Err(ApiError::NotFound(PLANT_NOT_FOUND)),
    }
}

/// PUT /api/health/:id
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(remark_id): Path<i64>,
    Json(body): Json<RemarkBody>,
) -> Result<Json<health_remark::Model>, ApiError> {
    let user_id = current_user(&headers)?;
    health::update(&state.db, user_id, remark_id, &body.remarks)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(REMARK_NOT_FOUND))
}

/// DELETE /api/health/:id
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(remark_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let user_id = current_user(&headers)?;
    if health::delete(&state.db, user_id, remark_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(REMARK_NOT_FOUND))
    }
}
