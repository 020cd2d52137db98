//! User administration endpoints.
//!
//! Everything here except the one-time super-admin bootstrap sits behind the
//! auth middleware; the permission-lifecycle endpoints additionally enforce
//! the super-admin-only gate inside `fleetdesk_auth::lifecycle`.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;

use fleetdesk_auth::{lifecycle, parse_permissions, Department, NewUser, User};
use fleetdesk_core::UserId;

use crate::app::dto::{
    BootstrapSuperAdminRequest, CreateUserRequest, PermissionsRequest, UpdateUserRequest,
    UserResponse,
};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route(
            "/:user_id",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/:user_id/permissions/grant", patch(grant_permissions))
        .route("/:user_id/permissions/revoke", patch(revoke_permissions))
        .route("/:user_id/permissions/reset", patch(reset_permissions))
        .route("/:user_id/make-admin", patch(make_administrator))
        .route("/:user_id/remove-admin", patch(remove_administrator))
}

fn parse_user_id(raw: &str) -> Result<UserId, axum::response::Response> {
    raw.parse::<UserId>()
        .map_err(|_| errors::json_message(StatusCode::BAD_REQUEST, "Invalid user id"))
}

/// POST /bootstrap/super-admin - create the first super admin (public, once).
pub async fn bootstrap_super_admin(
    Extension(services): Extension<Arc<AppServices>>,
    Json(req): Json<BootstrapSuperAdminRequest>,
) -> axum::response::Response {
    if services.users.list().iter().any(|u| u.is_super_admin) {
        return errors::json_message(StatusCode::BAD_REQUEST, "Super admin already exists");
    }

    let user = match User::create(
        NewUser {
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
            email: req.email,
            department: None,
            permissions: Default::default(),
            is_super_admin: true,
            is_administrator: false,
        },
        Utc::now(),
    ) {
        Ok(user) => user,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.users.insert(user.clone()) {
        return errors::store_error_to_response(e);
    }

    let token = match services.codec.issue(user.id) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "failed to issue bootstrap token");
            return errors::json_message(StatusCode::INTERNAL_SERVER_ERROR, "token issue failed");
        }
    };

    tracing::info!(user_id = %user.id, "super admin bootstrapped");
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Super Admin Created Successfully",
            "token": token,
            "user": user,
        })),
    )
        .into_response()
}

/// POST /users - create a user (super admin only).
pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Json(req): Json<CreateUserRequest>,
) -> axum::response::Response {
    if let Err(deny) = authz::require_super_admin(Some(ctx.principal())) {
        return deny;
    }

    let department = match req.department.as_deref() {
        Some(raw) => match raw.parse::<Department>() {
            Ok(department) => Some(department),
            Err(_) => return errors::json_message(StatusCode::BAD_REQUEST, "Invalid department"),
        },
        None if req.is_super_admin => None,
        None => return errors::json_message(StatusCode::BAD_REQUEST, "Invalid department"),
    };

    let permissions = match parse_permissions(req.permissions.iter().map(String::as_str)) {
        Ok(permissions) => permissions,
        Err(invalid) => {
            return errors::json_message(
                StatusCode::BAD_REQUEST,
                format!("Invalid permissions: {}", invalid.join(", ")),
            );
        }
    };

    let user = match User::create(
        NewUser {
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
            email: req.email,
            department,
            permissions,
            is_super_admin: req.is_super_admin,
            is_administrator: req.is_administrator,
        },
        Utc::now(),
    ) {
        Ok(user) => user,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.users.insert(user.clone()) {
        return errors::store_error_to_response(e);
    }

    tracing::info!(user_id = %user.id, "user created");
    (
        StatusCode::CREATED,
        Json(UserResponse::new("User created successfully", user)),
    )
        .into_response()
}

/// GET /users - list all users (admins).
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(deny) = authz::require_admin(Some(ctx.principal())) {
        return deny;
    }

    let users = services.users.list();
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

/// GET /users/:user_id (admins).
pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(user_id): Path<String>,
) -> axum::response::Response {
    if let Err(deny) = authz::require_admin(Some(ctx.principal())) {
        return deny;
    }
    let user_id = match parse_user_id(&user_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.users.find_by_id(&user_id) {
        Some(user) => (StatusCode::OK, Json(json!({ "user": user }))).into_response(),
        None => errors::json_message(StatusCode::NOT_FOUND, "User not found"),
    }
}

/// PATCH /users/:user_id - profile/permission update (super admin only).
pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> axum::response::Response {
    let user_id = match parse_user_id(&user_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let update = lifecycle::UpdateUser {
        first_name: req.first_name,
        last_name: req.last_name,
        phone_number: req.phone_number,
        department: req.department,
        permissions: req.permissions,
        is_active: req.is_active,
    };

    match lifecycle::replace_on_update(
        services.users.as_ref(),
        Some(ctx.principal()),
        &user_id,
        update,
        Utc::now(),
    ) {
        Ok(user) => (StatusCode::OK, Json(UserResponse::new("User updated", user))).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

/// DELETE /users/:user_id (super admin only).
pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(user_id): Path<String>,
) -> axum::response::Response {
    if let Err(deny) = authz::require_super_admin(Some(ctx.principal())) {
        return deny;
    }
    let user_id = match parse_user_id(&user_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.users.delete(&user_id) {
        Ok(()) => errors::json_message(StatusCode::OK, "User deleted successfully"),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// PATCH /users/:user_id/permissions/grant - full-replace grant.
pub async fn grant_permissions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(user_id): Path<String>,
    Json(req): Json<PermissionsRequest>,
) -> axum::response::Response {
    let user_id = match parse_user_id(&user_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match lifecycle::grant(
        services.users.as_ref(),
        Some(ctx.principal()),
        &user_id,
        &req.permissions,
        Utc::now(),
    ) {
        Ok(user) => (
            StatusCode::OK,
            Json(UserResponse::new("Permissions granted", user)),
        )
            .into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

/// PATCH /users/:user_id/permissions/revoke - remove specific permissions.
pub async fn revoke_permissions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(user_id): Path<String>,
    Json(req): Json<PermissionsRequest>,
) -> axum::response::Response {
    let user_id = match parse_user_id(&user_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match lifecycle::revoke(
        services.users.as_ref(),
        Some(ctx.principal()),
        &user_id,
        &req.permissions,
        Utc::now(),
    ) {
        Ok(user) => (
            StatusCode::OK,
            Json(UserResponse::new("Permissions revoked successfully", user)),
        )
            .into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

/// PATCH /users/:user_id/permissions/reset - back to department defaults.
pub async fn reset_permissions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(user_id): Path<String>,
) -> axum::response::Response {
    let user_id = match parse_user_id(&user_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match lifecycle::reset_to_department_default(
        services.users.as_ref(),
        Some(ctx.principal()),
        &user_id,
        Utc::now(),
    ) {
        Ok(user) => (
            StatusCode::OK,
            Json(UserResponse::new(
                "User permissions reset to department defaults",
                user,
            )),
        )
            .into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

/// PATCH /users/:user_id/make-admin.
pub async fn make_administrator(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(user_id): Path<String>,
) -> axum::response::Response {
    set_administrator_flag(&services, &ctx, &user_id, true).await
}

/// PATCH /users/:user_id/remove-admin.
pub async fn remove_administrator(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(user_id): Path<String>,
) -> axum::response::Response {
    set_administrator_flag(&services, &ctx, &user_id, false).await
}

async fn set_administrator_flag(
    services: &AppServices,
    ctx: &PrincipalContext,
    user_id: &str,
    enabled: bool,
) -> axum::response::Response {
    let user_id = match parse_user_id(user_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match lifecycle::set_administrator(
        services.users.as_ref(),
        Some(ctx.principal()),
        &user_id,
        enabled,
        Utc::now(),
    ) {
        Ok(user) => {
            let message = if enabled {
                "User is now an administrator"
            } else {
                "User is no longer an administrator"
            };
            (StatusCode::OK, Json(UserResponse::new(message, user))).into_response()
        }
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}
