//! Activity management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// Activity routes (all authenticated). Enrollment routes live here too
/// since they are addressed through the activity.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Activity CRUD
        .route("/", get(handler::list_activities))
        .route("/", post(handler::create_activity))
        .route("/{id}", get(handler::get_activity))
        .route("/{id}", patch(handler::update_activity))
        .route("/{id}", delete(handler::delete_activity))
        .route("/{id}/enable", patch(handler::enable_activity))
        .route("/{id}/disable", patch(handler::disable_activity))
        // Activities a user participates in
        .route("/user/{id}", get(handler::get_user_activities))
        // Enrollment
        .route("/{id}/assignments", get(handler::list_activity_assignments))
        .route("/{id}/assign-many", post(handler::assign_many))
        .route("/{id}/assignment/{user_id}", post(handler::assign_user))
        .route("/{id}/assignment/{user_id}", delete(handler::unassign_user))
        .route("/{id}/assignment/{user_id}", patch(handler::update_assignment))
        .route("/{id}/assignment/{user_id}", get(handler::get_assignment))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
