//! Route guards: translate engine denials into HTTP responses.
//!
//! The engine itself is pure; this is the one place Deny outcomes become 401
//! vs 403 JSON bodies. Handlers call a guard first and return early on `Err`.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use fleetdesk_auth::{
    authorize, authorize_admin_only, authorize_super_admin_only, AuthzError, Permission, Principal,
};

/// Allow iff the principal holds any of `required`.
pub fn require_any(
    principal: Option<&Principal>,
    required: &[Permission],
) -> Result<(), axum::response::Response> {
    authorize(principal, required).map_err(deny_response)
}

/// Allow super admins and administrators.
pub fn require_admin(principal: Option<&Principal>) -> Result<(), axum::response::Response> {
    authorize_admin_only(principal).map_err(deny_response)
}

/// Allow super admins only.
pub fn require_super_admin(principal: Option<&Principal>) -> Result<(), axum::response::Response> {
    authorize_super_admin_only(principal).map_err(deny_response)
}

/// Map a denial to its response: 401 for a missing principal, 403 otherwise.
/// Insufficient-permission denials list both sides for transparency.
pub fn deny_response(err: AuthzError) -> axum::response::Response {
    match err {
        AuthzError::Unauthenticated => (
            StatusCode::UNAUTHORIZED,
            axum::Json(json!({ "message": "Authentication required." })),
        )
            .into_response(),
        AuthzError::InsufficientPermission { required, held } => (
            StatusCode::FORBIDDEN,
            axum::Json(json!({
                "message": "Insufficient permissions.",
                "required_permissions": required,
                "user_permissions": held,
            })),
        )
            .into_response(),
        AuthzError::AdminRequired => (
            StatusCode::FORBIDDEN,
            axum::Json(json!({ "message": "Admin access required." })),
        )
            .into_response(),
        AuthzError::SuperAdminRequired => (
            StatusCode::FORBIDDEN,
            axum::Json(json!({ "message": err.to_string() })),
        )
            .into_response(),
    }
}
