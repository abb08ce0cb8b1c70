//! Activity handler implementations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::repositories::assignment_repo::AssignmentFilter,
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    services::{ActivityService, AssignmentService},
    state::AppState,
    utils::validation,
};

use super::{
    request::{CreateActivityRequest, ListActivitiesQuery, UpdateActivityRequest},
    response::{ActivitiesListResponse, ActivityResponse},
};
use crate::handlers::assignments::{
    request::{AssignManyRequest, AssignRequest, UpdateAssignmentRequest},
    response::{AssignmentResponse, AssignmentsListResponse},
};

/// List activities (role-narrowed)
pub async fn list_activities(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ListActivitiesQuery>,
) -> AppResult<Json<ActivitiesListResponse>> {
    let activities = ActivityService::list_activities(
        state.db(),
        &auth_user,
        query.area.as_ref(),
        query.limit_date,
        query.search.as_deref(),
    )
    .await?;

    Ok(Json(ActivitiesListResponse { activities }))
}

/// Create a new activity
pub async fn create_activity(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateActivityRequest>,
) -> AppResult<(StatusCode, Json<ActivityResponse>)> {
    payload.validate()?;
    validate_promotions(payload.participating_promotions.as_deref())?;

    if payload.registration_end_date < payload.registration_start_date {
        return Err(AppError::Validation(
            "Registration end must be after registration start".to_string(),
        ));
    }

    let activity =
        ActivityService::create_activity(state.db(), state.redis(), &auth_user, payload).await?;

    Ok((StatusCode::CREATED, Json(activity)))
}

/// Get a specific activity
pub async fn get_activity(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ActivityResponse>> {
    let activity = ActivityService::get_activity(state.db(), &id).await?;
    Ok(Json(activity))
}

/// Update an activity
pub async fn update_activity(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateActivityRequest>,
) -> AppResult<Json<ActivityResponse>> {
    payload.validate()?;
    validate_promotions(payload.participating_promotions.as_deref())?;

    let activity =
        ActivityService::update_activity(state.db(), state.redis(), &auth_user, &id, payload)
            .await?;

    Ok(Json(activity))
}

/// Delete an activity
pub async fn delete_activity(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    ActivityService::delete_activity(state.db(), state.redis(), &auth_user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Enable an activity
pub async fn enable_activity(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ActivityResponse>> {
    let activity = ActivityService::set_blocked(state.db(), &auth_user, &id, false).await?;
    Ok(Json(activity))
}

/// Disable an activity
pub async fn disable_activity(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ActivityResponse>> {
    let activity = ActivityService::set_blocked(state.db(), &auth_user, &id, true).await?;
    Ok(Json(activity))
}

/// Activities a user is enrolled in
pub async fn get_user_activities(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ActivitiesListResponse>> {
    let activities = ActivityService::user_activities(state.db(), &id).await?;
    Ok(Json(ActivitiesListResponse { activities }))
}

// ============================================================================
// Enrollment
// ============================================================================

/// Enroll a user in an activity
pub async fn assign_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
    payload: Option<Json<AssignRequest>>,
) -> AppResult<(StatusCode, Json<AssignmentResponse>)> {
    let completed = payload
        .as_ref()
        .and_then(|p| p.completed)
        .unwrap_or(false);

    let assignment =
        AssignmentService::assign(state.db(), &auth_user, &id, &user_id, completed).await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Enroll a batch of users in an activity
pub async fn assign_many(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignManyRequest>,
) -> AppResult<(StatusCode, Json<AssignmentsListResponse>)> {
    payload.validate()?;

    let assignments = AssignmentService::assign_many(
        state.db(),
        &auth_user,
        &id,
        &payload.user_ids,
        payload.completed.unwrap_or(false),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AssignmentsListResponse {
            assignments,
            page: None,
        }),
    ))
}

/// Remove a user's enrollment
pub async fn unassign_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    AssignmentService::unassign(state.db(), &auth_user, &id, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Update an enrollment's completion state or additional hours
pub async fn update_assignment(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateAssignmentRequest>,
) -> AppResult<StatusCode> {
    AssignmentService::update_assignment(
        state.db(),
        &auth_user,
        &id,
        &user_id,
        payload.completed,
        payload.additional_service_hours,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Fetch one enrollment
pub async fn get_assignment(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<AssignmentResponse>> {
    let assignment = AssignmentService::get_assignment(state.db(), &id, &user_id).await?;
    Ok(Json(assignment))
}

/// List the enrollments of an activity
pub async fn list_activity_assignments(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AssignmentsListResponse>> {
    let filter = AssignmentFilter {
        activity_id: Some(&id),
        ..Default::default()
    };

    let assignments = AssignmentService::list_assignments(state.db(), &filter, true).await?;

    Ok(Json(AssignmentsListResponse {
        assignments,
        page: None,
    }))
}

/// Restriction-list entries must name a promotion year or group
fn validate_promotions(entries: Option<&[String]>) -> AppResult<()> {
    for entry in entries.unwrap_or_default() {
        validation::validate_promotion_entry(entry)
            .map_err(|e| AppError::Validation(e.to_string()))?;
    }
    Ok(())
}
