//! Payment management handlers

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

/// Payment routes (all authenticated)
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_payments))
        .route("/", post(handler::create_payment))
        .route("/treasurer/me", get(handler::list_own_treasurer_payments))
        .route("/{id}", get(handler::get_payment))
        .route("/{id}", patch(handler::update_payment))
        .route("/{id}", delete(handler::delete_payment))
        .route("/{id}/assign", post(handler::assign_payment))
        .route("/{id}/assignments", delete(handler::delete_assignments))
        .route("/{id}/assignment/{user_id}", delete(handler::delete_assignment))
        .route("/assignment/{id}/complete", patch(handler::complete_assignment))
        .route("/assignment/{id}/confirm", patch(handler::confirm_assignment))
        .route("/assignment/{id}/reset", patch(handler::reset_assignment))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
