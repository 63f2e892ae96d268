//! Drivers API endpoints.

use api_types::driver::{DriverNew, DriverStatusUpdate, DriverUpdate, DriverView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{NewDriverCmd, UpdateDriverCmd};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user::AuthUser, views};

pub async fn driver_new(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<DriverNew>,
) -> Result<(StatusCode, Json<DriverView>), ServerError> {
    user.require_admin()?;
    let cmd = NewDriverCmd {
        name: payload.name,
        phone: payload.phone,
        vehicle: payload.vehicle,
    };
    let driver = state.engine.create_driver(cmd).await?;
    Ok((StatusCode::CREATED, Json(views::driver(driver))))
}

pub async fn list(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<DriverView>>, ServerError> {
    let drivers = state.engine.drivers().await?;
    Ok(Json(drivers.into_iter().map(views::driver).collect()))
}

pub async fn get(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(driver_id): Path<Uuid>,
) -> Result<Json<DriverView>, ServerError> {
    Ok(Json(views::driver(state.engine.driver(driver_id).await?)))
}

pub async fn update(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(driver_id): Path<Uuid>,
    Json(payload): Json<DriverUpdate>,
) -> Result<Json<DriverView>, ServerError> {
    let cmd = UpdateDriverCmd {
        name: payload.name,
        phone: payload.phone,
        vehicle: payload.vehicle,
    };
    let driver = state.engine.update_driver(driver_id, cmd).await?;
    Ok(Json(views::driver(driver)))
}

pub async fn update_status(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(driver_id): Path<Uuid>,
    Json(payload): Json<DriverStatusUpdate>,
) -> Result<Json<DriverView>, ServerError> {
    let driver = state
        .engine
        .update_driver_status(driver_id, views::engine_availability(payload.status))
        .await?;
    Ok(Json(views::driver(driver)))
}

pub async fn delete(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(driver_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    user.require_admin()?;
    state.engine.delete_driver(driver_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
