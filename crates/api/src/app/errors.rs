use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use fleetdesk_auth::{LifecycleError, StoreError};
use fleetdesk_core::DomainError;

use crate::authz;

pub fn json_message(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({ "message": message.into() })),
    )
        .into_response()
}

pub fn lifecycle_error_to_response(err: LifecycleError) -> axum::response::Response {
    match err {
        LifecycleError::Authz(e) => authz::deny_response(e),
        LifecycleError::InvalidPermissions(tokens) => json_message(
            StatusCode::BAD_REQUEST,
            format!("Invalid permissions: {}", tokens.join(", ")),
        ),
        LifecycleError::InvalidDepartment(raw) => {
            json_message(StatusCode::BAD_REQUEST, format!("Invalid department: {raw}"))
        }
        LifecycleError::TargetIsSuperAdmin => json_message(
            StatusCode::BAD_REQUEST,
            "Cannot modify super admin permissions",
        ),
        LifecycleError::NoDepartmentAssigned => {
            json_message(StatusCode::BAD_REQUEST, "User has no department assigned")
        }
        LifecycleError::TargetNotFound => json_message(StatusCode::NOT_FOUND, "User not found"),
        LifecycleError::Store(e) => store_error_to_response(e),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound => json_message(StatusCode::NOT_FOUND, "User not found"),
        StoreError::DuplicateEmail(email) => json_message(
            StatusCode::BAD_REQUEST,
            format!("Email already registered: {email}"),
        ),
        // Transport failure in the backing store; passed through untouched.
        StoreError::Unavailable(msg) => {
            json_message(StatusCode::INTERNAL_SERVER_ERROR, msg)
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) | DomainError::InvariantViolation(msg) => {
            json_message(StatusCode::BAD_REQUEST, msg)
        }
        DomainError::InvalidId(msg) => json_message(StatusCode::BAD_REQUEST, msg),
        DomainError::NotFound => json_message(StatusCode::NOT_FOUND, "not found"),
    }
}
