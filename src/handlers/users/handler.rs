//! User handler implementations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::{roles, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::UserService,
    state::AppState,
};

use super::{
    request::{CreateUserRequest, ListUsersQuery, UpdatePasswordRequest, UpdateUserRequest},
    response::{ServiceHoursResponse, UserProfileResponse, UserResponse, UsersListResponse},
};

/// Create a new user (admin)
pub async fn create_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    auth_user.require_any(&[roles::ADMIN])?;
    payload.validate()?;

    let user = UserService::create_user(state.db(), payload).await?;
    let user_roles = UserService::get_roles(state.db(), &user.id).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from_parts(user, user_roles))))
}

/// List users (admin)
pub async fn list_users(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<UsersListResponse>> {
    auth_user.require_any(&[roles::ADMIN, roles::AREA_RESPONSIBLE, roles::ACTIVITY_RESPONSIBLE])?;

    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);

    let (users, total) = UserService::list_users(
        state.db(),
        page,
        per_page,
        query.search.as_deref(),
        query.promotion,
    )
    .await?;

    let mut responses = Vec::with_capacity(users.len());
    for user in users {
        let user_roles = UserService::get_roles(state.db(), &user.id).await?;
        responses.push(UserResponse::from_parts(user, user_roles));
    }

    Ok(Json(UsersListResponse {
        users: responses,
        total,
        page,
        per_page,
    }))
}

/// Get the caller's profile with the service-hour ledger
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<UserProfileResponse>> {
    let user = UserService::get_user(state.db(), &auth_user.id).await?;
    let user_roles = UserService::get_roles(state.db(), &user.id).await?;
    let areas = UserService::get_area_hours(state.db(), &user.id).await?;
    let total = user.total_service_hours;

    Ok(Json(UserProfileResponse {
        user: UserResponse::from_parts(user, user_roles),
        service_hours: ServiceHoursResponse { areas, total },
    }))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserProfileResponse>> {
    auth_user.require_any(&[roles::ADMIN, roles::AREA_RESPONSIBLE, roles::ACTIVITY_RESPONSIBLE])?;

    let user = UserService::get_user(state.db(), &id).await?;
    let user_roles = UserService::get_roles(state.db(), &user.id).await?;
    let areas = UserService::get_area_hours(state.db(), &user.id).await?;
    let total = user.total_service_hours;

    Ok(Json(UserProfileResponse {
        user: UserResponse::from_parts(user, user_roles),
        service_hours: ServiceHoursResponse { areas, total },
    }))
}

/// Update a user's identity fields (admin)
pub async fn update_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    auth_user.require_any(&[roles::ADMIN])?;
    payload.validate()?;

    let user = UserService::update_user(state.db(), &id, payload).await?;
    let user_roles = UserService::get_roles(state.db(), &user.id).await?;

    Ok(Json(UserResponse::from_parts(user, user_roles)))
}

/// Change the caller's password
pub async fn update_password(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<UpdatePasswordRequest>,
) -> AppResult<StatusCode> {
    payload.validate()?;

    UserService::update_password(
        state.db(),
        &auth_user.id,
        &payload.current_password,
        &payload.new_password,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Block a user (admin)
pub async fn block_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    auth_user.require_any(&[roles::ADMIN])?;

    UserService::set_blocked(state.db(), state.redis(), &id, true).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Unblock a user (admin)
pub async fn unblock_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    auth_user.require_any(&[roles::ADMIN])?;

    UserService::set_blocked(state.db(), state.redis(), &id, false).await?;
    Ok(StatusCode::NO_CONTENT)
}
