//! Area handler implementations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::roles,
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::AreaService,
    state::AppState,
};

use super::{
    request::{CreateAreaRequest, UpdateAreaRequest},
    response::{AreaResponse, AreasListResponse},
};

/// List all areas
pub async fn list_areas(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
) -> AppResult<Json<AreasListResponse>> {
    let areas = AreaService::list_areas(state.db()).await?;
    Ok(Json(AreasListResponse { areas }))
}

/// Create a new area (admin)
pub async fn create_area(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateAreaRequest>,
) -> AppResult<(StatusCode, Json<AreaResponse>)> {
    auth_user.require_any(&[roles::ADMIN])?;
    payload.validate()?;

    let area = AreaService::create_area(state.db(), state.redis(), payload).await?;

    Ok((StatusCode::CREATED, Json(area)))
}

/// Get a specific area
pub async fn get_area(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AreaResponse>> {
    let area = AreaService::get_area(state.db(), &id).await?;
    Ok(Json(area))
}

/// Update an area (admin)
pub async fn update_area(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAreaRequest>,
) -> AppResult<Json<AreaResponse>> {
    auth_user.require_any(&[roles::ADMIN])?;
    payload.validate()?;

    let area = AreaService::update_area(state.db(), state.redis(), &id, payload).await?;

    Ok(Json(area))
}

/// Delete an area (admin)
pub async fn delete_area(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    auth_user.require_any(&[roles::ADMIN])?;

    AreaService::delete_area(state.db(), state.redis(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Enable an area (admin)
pub async fn enable_area(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AreaResponse>> {
    auth_user.require_any(&[roles::ADMIN])?;

    let area = AreaService::set_blocked(state.db(), &id, false).await?;
    Ok(Json(area))
}

/// Disable an area (admin)
pub async fn disable_area(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AreaResponse>> {
    auth_user.require_any(&[roles::ADMIN])?;

    let area = AreaService::set_blocked(state.db(), &id, true).await?;
    Ok(Json(area))
}
