//! Request/response DTOs.
//!
//! Permission and department fields arrive as wire tokens and are validated
//! against the catalog in the handlers/lifecycle, so invalid tokens produce a
//! 400 listing them rather than a deserialization failure.

use serde::{Deserialize, Serialize};

use fleetdesk_auth::User;

#[derive(Debug, Deserialize)]
pub struct BootstrapSuperAdminRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub department: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub is_super_admin: bool,
    #[serde(default)]
    pub is_administrator: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub department: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PermissionsRequest {
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub message: String,
    pub user: User,
}

impl UserResponse {
    pub fn new(message: impl Into<String>, user: User) -> Self {
        Self {
            message: message.into(),
            user,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDriverRequest {
    pub full_name: String,
    pub phone_number: String,
    pub license_number: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDriverRequest {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub license_number: Option<String>,
    pub status: Option<crate::app::services::DriverStatus>,
}
