use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::models::*;
use crate::AppState;

use super::{created, ApiError};

/// List all devices, ascending by id
pub async fn list_devices(State(state): State<Arc<AppState>>) -> Json<Vec<Device>> {
    Json(state.registry.list().await)
}

/// Get a single device by id
pub async fn get_device(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Device>, ApiError> {
    let Path(id) = id?;
    let device = state
        .registry
        .get(id)
        .await
        .ok_or_else(|| ApiError::not_found("device"))?;
    Ok(Json(device))
}

/// Create a new device
pub async fn create_device(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DevicePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Device>), ApiError> {
    let Json(req) = body?;
    let device = state.registry.create(req).await?;
    Ok(created(device))
}

/// Replace an existing device; the path id wins over any id in the body
pub async fn update_device(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<DevicePayload>, JsonRejection>,
) -> Result<Json<Device>, ApiError> {
    let Path(id) = id?;
    // an unknown id is a 404 even when the body is malformed
    if state.registry.get(id).await.is_none() {
        return Err(ApiError::not_found("device"));
    }
    let Json(req) = body?;
    let device = state.registry.update(id, req).await?;
    Ok(Json(device))
}

/// Delete a device
pub async fn delete_device(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.registry.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
