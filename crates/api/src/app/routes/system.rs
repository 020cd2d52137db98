use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::context::PrincipalContext;

/// GET /health - liveness probe (unauthenticated).
pub async fn health() -> axum::response::Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

/// GET /whoami - the resolved principal for the current request.
pub async fn whoami(Extension(ctx): Extension<PrincipalContext>) -> axum::response::Response {
    (StatusCode::OK, Json(json!({ "principal": ctx.principal() }))).into_response()
}
