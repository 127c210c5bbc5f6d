//! API routes module
//!
//! `routes` is nested under /api by `axum_helpers::create_router`; the
//! readiness probe is mounted at the root next to `/health`.

pub mod health;

use axum::Router;
use domain_catalog::handlers;

use crate::state::AppState;

/// Versioned catalog routes
pub fn routes(state: &AppState) -> Router {
    Router::new().nest(
        "/v1",
        handlers::router(&state.repositories, &state.config.server.public_base_url),
    )
}
