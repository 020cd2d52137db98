//! HTTP application wiring (axum router + service wiring).
//!
//! - `services.rs`: application state (user store, driver registry, tokens)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(jwt_secret: String) -> Router {
    let services = Arc::new(services::build_services(&jwt_secret));

    let auth_state = middleware::AuthState {
        codec: services.codec.clone(),
        users: services.users.clone(),
    };

    // Protected routes: require a resolved, active principal.
    let protected = routes::router().layer(
        ServiceBuilder::new()
            .layer(Extension(services.clone()))
            .layer(axum::middleware::from_fn_with_state(
                auth_state,
                middleware::auth_middleware,
            )),
    );

    // Public routes: liveness + one-time super-admin bootstrap.
    let public = Router::new()
        .route("/health", get(routes::system::health))
        .route(
            "/bootstrap/super-admin",
            post(routes::users::bootstrap_super_admin),
        )
        .layer(Extension(services));

    Router::new().merge(public).merge(protected)
}
