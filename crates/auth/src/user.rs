//! Stored user record.
//!
//! This is the persisted form of a principal. The stored permission set stays
//! honest: creating or saving a super admin never materializes the full
//! catalog into it — the bypass belongs to the decision primitives on
//! [`Principal`], not to storage.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fleetdesk_core::{DomainError, UserId};

use crate::catalog::{Department, Permission};
use crate::principal::Principal;

/// Back-office user record.
///
/// # Invariants
/// - Non-super-admin users always have a department.
/// - `permissions` only holds catalog tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub department: Option<Department>,
    pub permissions: HashSet<Permission>,
    pub is_super_admin: bool,
    pub is_administrator: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user record.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub department: Option<Department>,
    pub permissions: HashSet<Permission>,
    pub is_super_admin: bool,
    pub is_administrator: bool,
}

impl User {
    /// Validate and build a user record.
    pub fn create(new: NewUser, now: DateTime<Utc>) -> Result<Self, DomainError> {
        if new.first_name.trim().is_empty() {
            return Err(DomainError::validation("first name cannot be empty"));
        }
        if new.last_name.trim().is_empty() {
            return Err(DomainError::validation("last name cannot be empty"));
        }
        if new.email.trim().is_empty() || !new.email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }
        if !new.is_super_admin && new.department.is_none() {
            return Err(DomainError::validation(
                "department is required for non-super-admin users",
            ));
        }

        Ok(Self {
            id: UserId::new(),
            first_name: new.first_name.trim().to_string(),
            last_name: new.last_name.trim().to_string(),
            phone_number: new.phone_number.trim().to_string(),
            email: new.email.trim().to_lowercase(),
            department: new.department,
            permissions: new.permissions,
            is_super_admin: new.is_super_admin,
            is_administrator: new.is_administrator,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Derive the request-scoped principal from this record.
    pub fn to_principal(&self) -> Principal {
        Principal {
            id: self.id,
            department: self.department,
            permissions: self.permissions.clone(),
            is_super_admin: self.is_super_admin,
            is_administrator: self.is_administrator,
            is_active: self.is_active,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_member(department: Option<Department>, is_super_admin: bool) -> NewUser {
        NewUser {
            first_name: "Amina".to_string(),
            last_name: "Hassan".to_string(),
            phone_number: "+254700000001".to_string(),
            email: "Amina.Hassan@Example.com".to_string(),
            department,
            permissions: HashSet::new(),
            is_super_admin,
            is_administrator: false,
        }
    }

    #[test]
    fn create_normalizes_email_and_names() {
        let user = User::create(new_member(Some(Department::Fleet), false), Utc::now()).unwrap();
        assert_eq!(user.email, "amina.hassan@example.com");
        assert!(user.is_active);
        assert_eq!(user.department, Some(Department::Fleet));
    }

    #[test]
    fn non_super_admin_requires_department() {
        let result = User::create(new_member(None, false), Utc::now());
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn super_admin_stored_set_is_not_expanded() {
        let user = User::create(new_member(None, true), Utc::now()).unwrap();

        // Stored set stays empty; the bypass lives in the principal.
        assert!(user.permissions.is_empty());
        assert!(user.to_principal().has_permission(Permission::ManagePayroll));
    }

    #[test]
    fn create_rejects_malformed_email() {
        let mut new = new_member(Some(Department::Crm), false);
        new.email = "not-an-email".to_string();
        assert!(User::create(new, Utc::now()).is_err());
    }
}
