//! Assignment handler implementations

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    constants::roles,
    db::repositories::assignment_repo::AssignmentFilter,
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::AssignmentService,
    state::AppState,
};

use super::{
    request::ListAssignmentsQuery,
    response::AssignmentsListResponse,
};

/// List assignments across activities (staff)
pub async fn list_assignments(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ListAssignmentsQuery>,
) -> AppResult<Json<AssignmentsListResponse>> {
    auth_user.require_any(&[roles::ADMIN, roles::AREA_RESPONSIBLE, roles::ACTIVITY_RESPONSIBLE])?;

    let filter = AssignmentFilter {
        user_id: query.user_id.as_ref(),
        activity_id: query.activity_id.as_ref(),
        search: query.search.as_deref(),
        lower_date: query.lower_date,
        upper_date: query.upper_date,
        page: query.page,
    };

    let assignments = AssignmentService::list_assignments(
        state.db(),
        &filter,
        query.include_promotion_group.unwrap_or(true),
    )
    .await?;

    Ok(Json(AssignmentsListResponse {
        assignments,
        page: query.page,
    }))
}

/// List the caller's own assignments
pub async fn list_own_assignments(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ListAssignmentsQuery>,
) -> AppResult<Json<AssignmentsListResponse>> {
    let filter = AssignmentFilter {
        user_id: Some(&auth_user.id),
        activity_id: None,
        search: query.search.as_deref(),
        lower_date: query.lower_date,
        upper_date: query.upper_date,
        page: query.page,
    };

    let assignments = AssignmentService::list_assignments(state.db(), &filter, false).await?;

    Ok(Json(AssignmentsListResponse {
        assignments,
        page: query.page,
    }))
}
