//! Read-only views of the permission catalog and department directory.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use fleetdesk_auth::{defaults_for, Department, Permission};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/permissions", get(all_permissions))
        .route(
            "/departments/:department/permissions",
            get(department_permissions),
        )
        .route("/departments/:department/users", get(department_users))
}

fn parse_department(raw: &str) -> Result<Department, axum::response::Response> {
    raw.parse::<Department>()
        .map_err(|_| errors::json_message(StatusCode::BAD_REQUEST, "Invalid department"))
}

/// GET /permissions - the full catalog plus each department's defaults.
pub async fn all_permissions(
    Extension(ctx): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(deny) = authz::require_admin(Some(ctx.principal())) {
        return deny;
    }

    let department_permissions: serde_json::Map<String, serde_json::Value> = Department::ALL
        .iter()
        .map(|d| {
            (
                d.as_str().to_string(),
                json!(defaults_for(*d)),
            )
        })
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "message": "All permissions retrieved successfully",
            "data": {
                "all_permissions": Permission::ALL,
                "department_permissions": department_permissions,
            },
        })),
    )
        .into_response()
}

/// GET /departments/:department/permissions - a department's default subset.
pub async fn department_permissions(
    Extension(ctx): Extension<PrincipalContext>,
    Path(department): Path<String>,
) -> axum::response::Response {
    if let Err(deny) = authz::require_admin(Some(ctx.principal())) {
        return deny;
    }
    let department = match parse_department(&department) {
        Ok(department) => department,
        Err(resp) => return resp,
    };

    (
        StatusCode::OK,
        Json(json!({
            "message": "Department permissions retrieved successfully",
            "data": {
                "department": department,
                "permissions": defaults_for(department),
            },
        })),
    )
        .into_response()
}

/// GET /departments/:department/users - active users of a department.
pub async fn department_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(department): Path<String>,
) -> axum::response::Response {
    if let Err(deny) = authz::require_admin(Some(ctx.principal())) {
        return deny;
    }
    let department = match parse_department(&department) {
        Ok(department) => department,
        Err(resp) => return resp,
    };

    let users = services.users.list_by_department(department);
    (
        StatusCode::OK,
        Json(json!({
            "message": "Users retrieved successfully",
            "count": users.len(),
            "users": users,
        })),
    )
        .into_response()
}
