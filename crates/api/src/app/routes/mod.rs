use axum::{routing::get, Router};

pub mod catalog;
pub mod fleet;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/users", users::router())
        .nest("/fleet", fleet::router())
        .merge(catalog::router())
}
