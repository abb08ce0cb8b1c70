//! User management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// User routes (all authenticated)
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_users))
        .route("/", post(handler::create_user))
        .route("/me", get(handler::get_profile))
        .route("/me/password", patch(handler::update_password))
        .route("/{id}", get(handler::get_user))
        .route("/{id}", patch(handler::update_user))
        .route("/{id}/block", patch(handler::block_user))
        .route("/{id}/unblock", patch(handler::unblock_user))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
