//! Resolved principal and the two decision primitives.
//!
//! The super-admin bypass lives in [`Principal::has_permission`] and
//! [`Principal::has_any_permission`] and nowhere else. Business logic must
//! never inspect `permissions` directly, so "what is stored" and "what is
//! effectively granted" cannot drift apart.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use fleetdesk_core::UserId;

use crate::catalog::{Department, Permission};

/// The authenticated actor for the duration of one request.
///
/// # Invariants
/// - `department` is `None` only when `is_super_admin` is true.
/// - `permissions` only ever holds catalog tokens (guaranteed by the
///   `Permission` type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub department: Option<Department>,
    pub permissions: HashSet<Permission>,
    pub is_super_admin: bool,
    pub is_administrator: bool,
    pub is_active: bool,
}

impl Principal {
    /// True if the principal effectively holds `permission`.
    ///
    /// Super admins hold every permission regardless of the stored set.
    pub fn has_permission(&self, permission: Permission) -> bool {
        if self.is_super_admin {
            return true;
        }
        self.permissions.contains(&permission)
    }

    /// True if the principal effectively holds *any* of `permissions`.
    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        if self.is_super_admin {
            return true;
        }
        permissions.iter().any(|p| self.permissions.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

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
    fn member_holds_only_stored_permissions() {
        let principal = member(Department::Crm, &[Permission::ViewCrmModule]);

        assert!(principal.has_permission(Permission::ViewCrmModule));
        assert!(!principal.has_permission(Permission::AddAssetVehicle));
        assert!(principal.has_any_permission(&[
            Permission::AddAssetVehicle,
            Permission::ViewCrmModule,
        ]));
        assert!(!principal.has_any_permission(&[Permission::AddAssetVehicle]));
    }

    #[test]
    fn empty_required_set_never_matches() {
        let principal = member(Department::Fleet, &[Permission::ViewFleetModule]);
        assert!(!principal.has_any_permission(&[]));
    }

    proptest! {
        // Super admins hold every catalog permission even with an empty
        // stored set.
        #[test]
        fn super_admin_bypasses_stored_set(
            stored in proptest::collection::hash_set(
                proptest::sample::select(Permission::ALL),
                0..8,
            ),
            probe in proptest::sample::select(Permission::ALL),
        ) {
            let principal = Principal {
                id: UserId::new(),
                department: None,
                permissions: stored,
                is_super_admin: true,
                is_administrator: false,
                is_active: true,
            };

            prop_assert!(principal.has_permission(probe));
            prop_assert!(principal.has_any_permission(&[probe]));
        }
    }
}
