//! Driver registry endpoints.
//!
//! The representative permission-guarded domain slice: each route declares
//! its required permission set and the guard evaluates it with OR semantics
//! before any registry access.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::json;

use fleetdesk_auth::Permission;
use fleetdesk_core::DriverId;

use crate::app::dto::{CreateDriverRequest, UpdateDriverRequest};
use crate::app::errors;
use crate::app::services::{AppServices, Driver, DriverStatus};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/drivers", get(list_drivers).post(create_driver))
        .route(
            "/drivers/:driver_id",
            get(get_driver).patch(update_driver).delete(delete_driver),
        )
}

fn parse_driver_id(raw: &str) -> Result<DriverId, axum::response::Response> {
    raw.parse::<DriverId>()
        .map_err(|_| errors::json_message(StatusCode::BAD_REQUEST, "Invalid driver id"))
}

/// GET /fleet/drivers - either the fleet view or the report permission works.
pub async fn list_drivers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(deny) = authz::require_any(
        Some(ctx.principal()),
        &[Permission::ViewFleetModule, Permission::ViewFleetReport],
    ) {
        return deny;
    }

    let drivers = services.drivers.list();
    (
        StatusCode::OK,
        Json(json!({ "count": drivers.len(), "drivers": drivers })),
    )
        .into_response()
}

/// GET /fleet/drivers/:driver_id.
pub async fn get_driver(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(driver_id): Path<String>,
) -> axum::response::Response {
    if let Err(deny) = authz::require_any(
        Some(ctx.principal()),
        &[Permission::ViewFleetModule, Permission::ViewFleetReport],
    ) {
        return deny;
    }
    let driver_id = match parse_driver_id(&driver_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.drivers.get(&driver_id) {
        Some(driver) => (StatusCode::OK, Json(json!({ "driver": driver }))).into_response(),
        None => errors::json_message(StatusCode::NOT_FOUND, "Driver not found"),
    }
}

/// POST /fleet/drivers.
pub async fn create_driver(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Json(req): Json<CreateDriverRequest>,
) -> axum::response::Response {
    if let Err(deny) = authz::require_any(Some(ctx.principal()), &[Permission::AddDriver]) {
        return deny;
    }
    if req.full_name.trim().is_empty() || req.license_number.trim().is_empty() {
        return errors::json_message(
            StatusCode::BAD_REQUEST,
            "Driver name and license number are required",
        );
    }

    let now = Utc::now();
    let driver = Driver {
        id: DriverId::new(),
        full_name: req.full_name.trim().to_string(),
        phone_number: req.phone_number.trim().to_string(),
        license_number: req.license_number.trim().to_string(),
        status: DriverStatus::Available,
        created_at: now,
        updated_at: now,
    };
    services.drivers.insert(driver.clone());

    tracing::info!(driver_id = %driver.id, "driver created");
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Driver created successfully", "driver": driver })),
    )
        .into_response()
}

/// PATCH /fleet/drivers/:driver_id.
pub async fn update_driver(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(driver_id): Path<String>,
    Json(req): Json<UpdateDriverRequest>,
) -> axum::response::Response {
    if let Err(deny) = authz::require_any(Some(ctx.principal()), &[Permission::EditDriver]) {
        return deny;
    }
    let driver_id = match parse_driver_id(&driver_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut driver = match services.drivers.get(&driver_id) {
        Some(driver) => driver,
        None => return errors::json_message(StatusCode::NOT_FOUND, "Driver not found"),
    };

    if let Some(full_name) = req.full_name {
        driver.full_name = full_name;
    }
    if let Some(phone_number) = req.phone_number {
        driver.phone_number = phone_number;
    }
    if let Some(license_number) = req.license_number {
        driver.license_number = license_number;
    }
    if let Some(status) = req.status {
        driver.status = status;
    }
    driver.updated_at = Utc::now();

    if !services.drivers.save(driver.clone()) {
        return errors::json_message(StatusCode::NOT_FOUND, "Driver not found");
    }

    (
        StatusCode::OK,
        Json(json!({ "message": "Driver updated", "driver": driver })),
    )
        .into_response()
}

/// DELETE /fleet/drivers/:driver_id.
pub async fn delete_driver(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(driver_id): Path<String>,
) -> axum::response::Response {
    if let Err(deny) = authz::require_any(Some(ctx.principal()), &[Permission::DeleteDriver]) {
        return deny;
    }
    let driver_id = match parse_driver_id(&driver_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    if services.drivers.delete(&driver_id) {
        errors::json_message(StatusCode::OK, "Driver deleted successfully")
    } else {
        errors::json_message(StatusCode::NOT_FOUND, "Driver not found")
    }
}
