//! Assignment listing handlers
//!
//! Enrollment mutations are routed through the activities domain; this
//! module exposes the cross-activity listings.

mod handler;
pub mod request;
pub mod response;

pub use handler::*;

use axum::{middleware, routing::get, Router};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// Assignment routes (all authenticated)
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_assignments))
        .route("/me", get(handler::list_own_assignments))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
