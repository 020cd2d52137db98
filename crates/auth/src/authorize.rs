//! Pure authorization decisions.
//!
//! Three modes, all free of IO and side effects:
//! - [`authorize`]: OR semantics over a route's declared permission set.
//! - [`authorize_admin_only`]: super admins and administrators.
//! - [`authorize_super_admin_only`]: super admins only (the gate for every
//!   permission-lifecycle operation).
//!
//! An absent principal is always [`AuthzError::Unauthenticated`], distinct
//! from the insufficient-capability errors so callers can map 401 vs 403.

use thiserror::Error;

use crate::catalog::Permission;
use crate::principal::Principal;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("insufficient permissions")]
    InsufficientPermission {
        required: Vec<Permission>,
        held: Vec<Permission>,
    },

    #[error("admin access required")]
    AdminRequired,

    #[error("only super admins can perform this operation")]
    SuperAdminRequired,
}

impl AuthzError {
    /// True for denials that mean "no resolvable principal" (HTTP 401);
    /// everything else is an authenticated-but-forbidden denial (HTTP 403).
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, AuthzError::Unauthenticated)
    }
}

/// Allow iff the principal holds any one of `required`.
pub fn authorize(principal: Option<&Principal>, required: &[Permission]) -> Result<(), AuthzError> {
    let principal = principal.ok_or(AuthzError::Unauthenticated)?;

    if principal.has_any_permission(required) {
        return Ok(());
    }

    let mut held: Vec<Permission> = principal.permissions.iter().copied().collect();
    held.sort_by_key(|p| p.as_str());

    Err(AuthzError::InsufficientPermission {
        required: required.to_vec(),
        held,
    })
}

/// Allow iff the principal is a super admin or an administrator.
pub fn authorize_admin_only(principal: Option<&Principal>) -> Result<(), AuthzError> {
    let principal = principal.ok_or(AuthzError::Unauthenticated)?;

    if principal.is_super_admin || principal.is_administrator {
        Ok(())
    } else {
        Err(AuthzError::AdminRequired)
    }
}

/// Allow iff the principal is a super admin.
pub fn authorize_super_admin_only(principal: Option<&Principal>) -> Result<(), AuthzError> {
    let principal = principal.ok_or(AuthzError::Unauthenticated)?;

    if principal.is_super_admin {
        Ok(())
    } else {
        Err(AuthzError::SuperAdminRequired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{defaults_for, Department};
    use fleetdesk_core::UserId;

    fn member(department: Department, permissions: &[Permission]) -> Principal {
        Principal {
            id: UserId::new(),
            department: Some(department),
            permissions: permissions.iter().copied().collect(),
            is_super_admin: false,
            is_administrator: false,
            is_active: true,
        }
    }

    #[test]
    fn missing_principal_is_unauthenticated() {
        let err = authorize(None, &[Permission::ViewFleetModule]).unwrap_err();
        assert_eq!(err, AuthzError::Unauthenticated);
        assert!(err.is_unauthenticated());
        assert_eq!(err.to_string(), "authentication required");

        assert_eq!(authorize_admin_only(None), Err(AuthzError::Unauthenticated));
        assert_eq!(
            authorize_super_admin_only(None),
            Err(AuthzError::Unauthenticated)
        );
    }

    #[test]
    fn deny_lists_required_and_held_permissions() {
        let principal = member(Department::Crm, &[Permission::ViewCrmModule]);

        let err = authorize(Some(&principal), &[Permission::AddAssetVehicle]).unwrap_err();
        assert!(!err.is_unauthenticated());
        assert_eq!(
            err,
            AuthzError::InsufficientPermission {
                required: vec![Permission::AddAssetVehicle],
                held: vec![Permission::ViewCrmModule],
            }
        );
    }

    #[test]
    fn department_default_grants_the_view_route() {
        let principal = member(Department::Fleet, defaults_for(Department::Fleet));
        assert!(authorize(Some(&principal), &[Permission::ViewFleetModule]).is_ok());
    }

    #[test]
    fn any_one_of_the_required_set_suffices() {
        let principal = member(Department::Fleet, &[Permission::EditTrip]);
        assert!(authorize(
            Some(&principal),
            &[Permission::CreateTrip, Permission::EditTrip],
        )
        .is_ok());
    }

    #[test]
    fn admin_only_accepts_both_override_flags() {
        let mut principal = member(Department::Finance, &[]);
        assert_eq!(
            authorize_admin_only(Some(&principal)),
            Err(AuthzError::AdminRequired)
        );

        principal.is_administrator = true;
        assert!(authorize_admin_only(Some(&principal)).is_ok());

        principal.is_administrator = false;
        principal.is_super_admin = true;
        assert!(authorize_admin_only(Some(&principal)).is_ok());
    }

    #[test]
    fn administrator_is_not_a_super_admin() {
        let mut principal = member(Department::Finance, &[]);
        principal.is_administrator = true;

        assert_eq!(
            authorize_super_admin_only(Some(&principal)),
            Err(AuthzError::SuperAdminRequired)
        );
    }
}
