//! Area management handlers

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

/// Area routes (all authenticated)
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_areas))
        .route("/", post(handler::create_area))
        .route("/{id}", get(handler::get_area))
        .route("/{id}", patch(handler::update_area))
        .route("/{id}", delete(handler::delete_area))
        .route("/{id}/enable", patch(handler::enable_area))
        .route("/{id}/disable", patch(handler::disable_area))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
