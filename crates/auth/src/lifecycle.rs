//! Permission lifecycle operations.
//!
//! Every entry point requires a super-admin caller and refuses super-admin
//! targets. Inputs arrive as wire tokens (the shape of the admin payloads) and
//! are validated against the catalog before anything is written; each
//! operation persists the complete new permission set in a single `save`, so a
//! failed call leaves the target untouched.

use chrono::{DateTime, Utc};
use thiserror::Error;

use fleetdesk_core::UserId;

use crate::authorize::{authorize_super_admin_only, AuthzError};
use crate::catalog::{defaults_for, parse_permissions, Department};
use crate::principal::Principal;
use crate::store::{StoreError, UserStore};
use crate::user::User;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error("invalid permissions: {}", .0.join(", "))]
    InvalidPermissions(Vec<String>),

    #[error("invalid department: {0}")]
    InvalidDepartment(String),

    #[error("cannot modify super admin permissions")]
    TargetIsSuperAdmin,

    #[error("user has no department assigned")]
    NoDepartmentAssigned,

    #[error("user not found")]
    TargetNotFound,

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for LifecycleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => LifecycleError::TargetNotFound,
            other => LifecycleError::Store(other),
        }
    }
}

/// Profile update payload (wire-level; validated here).
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub department: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

fn load_target(
    store: &dyn UserStore,
    actor: Option<&Principal>,
    target: &UserId,
) -> Result<User, LifecycleError> {
    authorize_super_admin_only(actor)?;

    let user = store.find_by_id(target).ok_or(LifecycleError::TargetNotFound)?;
    if user.is_super_admin {
        return Err(LifecycleError::TargetIsSuperAdmin);
    }
    Ok(user)
}

/// Replace the target's permission set with `requested` (full replace, not
/// additive). Every requested token must be in the catalog.
pub fn grant(
    store: &dyn UserStore,
    actor: Option<&Principal>,
    target: &UserId,
    requested: &[String],
    now: DateTime<Utc>,
) -> Result<User, LifecycleError> {
    let mut user = load_target(store, actor, target)?;

    let parsed = parse_permissions(requested.iter().map(String::as_str))
        .map_err(LifecycleError::InvalidPermissions)?;

    user.permissions = parsed;
    user.touch(now);
    store.save(user.clone())?;

    tracing::info!(target_id = %user.id, count = user.permissions.len(), "permissions granted");
    Ok(user)
}

/// Remove `requested` tokens from the target's set.
///
/// Idempotent: tokens the target does not hold (including tokens outside the
/// catalog, which it cannot hold) are ignored.
pub fn revoke(
    store: &dyn UserStore,
    actor: Option<&Principal>,
    target: &UserId,
    requested: &[String],
    now: DateTime<Utc>,
) -> Result<User, LifecycleError> {
    let mut user = load_target(store, actor, target)?;

    user.permissions
        .retain(|p| !requested.iter().any(|r| r == p.as_str()));
    user.touch(now);
    store.save(user.clone())?;

    tracing::info!(target_id = %user.id, count = user.permissions.len(), "permissions revoked");
    Ok(user)
}

/// Apply a profile update, with grant-style validation for a permission
/// replacement and department validation when both change in the same call.
pub fn replace_on_update(
    store: &dyn UserStore,
    actor: Option<&Principal>,
    target: &UserId,
    update: UpdateUser,
    now: DateTime<Utc>,
) -> Result<User, LifecycleError> {
    let mut user = load_target(store, actor, target)?;

    // Validate everything before mutating anything.
    let department = match &update.department {
        Some(raw) => Some(
            raw.parse::<Department>()
                .map_err(|_| LifecycleError::InvalidDepartment(raw.clone()))?,
        ),
        None => None,
    };
    let permissions = match &update.permissions {
        Some(raw) => Some(
            parse_permissions(raw.iter().map(String::as_str))
                .map_err(LifecycleError::InvalidPermissions)?,
        ),
        None => None,
    };

    if let Some(first_name) = update.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = update.last_name {
        user.last_name = last_name;
    }
    if let Some(phone_number) = update.phone_number {
        user.phone_number = phone_number;
    }
    if let Some(department) = department {
        user.department = Some(department);
    }
    if let Some(permissions) = permissions {
        user.permissions = permissions;
    }
    if let Some(is_active) = update.is_active {
        user.is_active = is_active;
    }

    user.touch(now);
    store.save(user.clone())?;

    tracing::info!(target_id = %user.id, "user updated");
    Ok(user)
}

/// Reset the target's permissions to its department's default subset.
pub fn reset_to_department_default(
    store: &dyn UserStore,
    actor: Option<&Principal>,
    target: &UserId,
    now: DateTime<Utc>,
) -> Result<User, LifecycleError> {
    let mut user = load_target(store, actor, target)?;

    let department = user.department.ok_or(LifecycleError::NoDepartmentAssigned)?;

    user.permissions = defaults_for(department).iter().copied().collect();
    user.touch(now);
    store.save(user.clone())?;

    tracing::info!(target_id = %user.id, department = %department, "permissions reset to department default");
    Ok(user)
}

/// Toggle the administrator override flag.
pub fn set_administrator(
    store: &dyn UserStore,
    actor: Option<&Principal>,
    target: &UserId,
    enabled: bool,
    now: DateTime<Utc>,
) -> Result<User, LifecycleError> {
    let mut user = load_target(store, actor, target)?;

    user.is_administrator = enabled;
    user.touch(now);
    store.save(user.clone())?;

    tracing::info!(target_id = %user.id, enabled, "administrator flag changed");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Permission;
    use crate::store::InMemoryUserStore;
    use crate::user::NewUser;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn super_admin() -> Principal {
        Principal {
            id: UserId::new(),
            department: None,
            permissions: HashSet::new(),
            is_super_admin: true,
            is_administrator: false,
            is_active: true,
        }
    }

    fn plain_member() -> Principal {
        Principal {
            id: UserId::new(),
            department: Some(Department::Fleet),
            permissions: HashSet::new(),
            is_super_admin: false,
            is_administrator: false,
            is_active: true,
        }
    }

    fn seed_user(
        store: &InMemoryUserStore,
        email: &str,
        department: Option<Department>,
        permissions: &[Permission],
        is_super_admin: bool,
    ) -> User {
        let user = User::create(
            NewUser {
                first_name: "Seed".to_string(),
                last_name: "User".to_string(),
                phone_number: "+10000000000".to_string(),
                email: email.to_string(),
                department,
                permissions: permissions.iter().copied().collect(),
                is_super_admin,
                is_administrator: false,
            },
            Utc::now(),
        )
        .unwrap();
        store.insert(user.clone()).unwrap();
        user
    }

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn grant_is_full_replace_not_additive() {
        let store = InMemoryUserStore::new();
        let target = seed_user(
            &store,
            "t@example.com",
            Some(Department::Fleet),
            &[Permission::ViewFleetModule, Permission::AddDriver],
            false,
        );

        let updated = grant(
            &store,
            Some(&super_admin()),
            &target.id,
            &tokens(&["create_trip"]),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(
            updated.permissions,
            [Permission::CreateTrip].into_iter().collect()
        );
        assert_eq!(store.find_by_id(&target.id).unwrap().permissions, updated.permissions);
    }

    #[test]
    fn grant_with_unknown_token_changes_nothing() {
        let store = InMemoryUserStore::new();
        let target = seed_user(
            &store,
            "t@example.com",
            Some(Department::Fleet),
            &[Permission::ViewFleetModule],
            false,
        );

        let err = grant(
            &store,
            Some(&super_admin()),
            &target.id,
            &tokens(&["view_fleet", "fly_helicopter"]),
            Utc::now(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            LifecycleError::InvalidPermissions(vec!["fly_helicopter".to_string()])
        );
        assert_eq!(
            store.find_by_id(&target.id).unwrap().permissions,
            target.permissions
        );
    }

    #[test]
    fn super_admin_target_is_immutable() {
        let store = InMemoryUserStore::new();
        let target = seed_user(&store, "root@example.com", None, &[], true);
        let actor = super_admin();

        let grant_err = grant(
            &store,
            Some(&actor),
            &target.id,
            &tokens(&["view_fleet"]),
            Utc::now(),
        )
        .unwrap_err();
        let revoke_err = revoke(
            &store,
            Some(&actor),
            &target.id,
            &tokens(&["view_fleet"]),
            Utc::now(),
        )
        .unwrap_err();
        let reset_err =
            reset_to_department_default(&store, Some(&actor), &target.id, Utc::now()).unwrap_err();

        assert_eq!(grant_err, LifecycleError::TargetIsSuperAdmin);
        assert_eq!(revoke_err, LifecycleError::TargetIsSuperAdmin);
        assert_eq!(reset_err, LifecycleError::TargetIsSuperAdmin);
        assert_eq!(store.find_by_id(&target.id).unwrap().permissions, target.permissions);
    }

    #[test]
    fn non_super_admin_caller_is_rejected() {
        let store = InMemoryUserStore::new();
        let target = seed_user(
            &store,
            "t@example.com",
            Some(Department::Crm),
            &[],
            false,
        );

        let err = grant(
            &store,
            Some(&plain_member()),
            &target.id,
            &tokens(&["view_crm"]),
            Utc::now(),
        )
        .unwrap_err();

        assert_eq!(err, LifecycleError::Authz(AuthzError::SuperAdminRequired));
    }

    #[test]
    fn unknown_target_is_reported() {
        let store = InMemoryUserStore::new();
        let err = grant(
            &store,
            Some(&super_admin()),
            &UserId::new(),
            &tokens(&["view_fleet"]),
            Utc::now(),
        )
        .unwrap_err();

        assert_eq!(err, LifecycleError::TargetNotFound);
    }

    #[test]
    fn reset_is_deterministic_for_fleet() {
        let store = InMemoryUserStore::new();
        let target = seed_user(
            &store,
            "t@example.com",
            Some(Department::Fleet),
            &[Permission::AddDriver, Permission::CreateTrip],
            false,
        );

        let updated =
            reset_to_department_default(&store, Some(&super_admin()), &target.id, Utc::now())
                .unwrap();

        assert_eq!(
            updated.permissions,
            [Permission::ViewFleetModule].into_iter().collect()
        );
    }

    #[test]
    fn reset_after_manual_finance_grants() {
        let store = InMemoryUserStore::new();
        let target = seed_user(
            &store,
            "fin@example.com",
            Some(Department::Finance),
            &[Permission::ManagePayroll, Permission::ApproveBudget],
            false,
        );

        let updated =
            reset_to_department_default(&store, Some(&super_admin()), &target.id, Utc::now())
                .unwrap();

        assert_eq!(
            updated.permissions,
            [Permission::ViewFinanceModule].into_iter().collect()
        );
    }

    #[test]
    fn reset_without_department_fails() {
        let store = InMemoryUserStore::new();
        // A record with no department can only be a super admin at creation
        // time; simulate drift by clearing the department directly.
        let seeded = seed_user(
            &store,
            "drift@example.com",
            Some(Department::Crm),
            &[],
            false,
        );
        let mut drifted = seeded.clone();
        drifted.department = None;
        store.save(drifted).unwrap();

        let err =
            reset_to_department_default(&store, Some(&super_admin()), &seeded.id, Utc::now())
                .unwrap_err();
        assert_eq!(err, LifecycleError::NoDepartmentAssigned);
    }

    #[test]
    fn update_validates_department_and_permissions_together() {
        let store = InMemoryUserStore::new();
        let target = seed_user(
            &store,
            "t@example.com",
            Some(Department::Fleet),
            &[Permission::ViewFleetModule],
            false,
        );

        let err = replace_on_update(
            &store,
            Some(&super_admin()),
            &target.id,
            UpdateUser {
                department: Some("Space".to_string()),
                permissions: Some(tokens(&["view_finance"])),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err, LifecycleError::InvalidDepartment("Space".to_string()));
        // Nothing was written.
        assert_eq!(store.find_by_id(&target.id).unwrap().permissions, target.permissions);

        let updated = replace_on_update(
            &store,
            Some(&super_admin()),
            &target.id,
            UpdateUser {
                department: Some("Finance".to_string()),
                permissions: Some(tokens(&["view_finance"])),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(updated.department, Some(Department::Finance));
        assert_eq!(
            updated.permissions,
            [Permission::ViewFinanceModule].into_iter().collect()
        );
    }

    #[test]
    fn set_administrator_toggles_flag() {
        let store = InMemoryUserStore::new();
        let target = seed_user(
            &store,
            "t@example.com",
            Some(Department::Logistics),
            &[],
            false,
        );

        let promoted =
            set_administrator(&store, Some(&super_admin()), &target.id, true, Utc::now()).unwrap();
        assert!(promoted.is_administrator);

        let demoted =
            set_administrator(&store, Some(&super_admin()), &target.id, false, Utc::now()).unwrap();
        assert!(!demoted.is_administrator);
    }

    proptest! {
        // Revoking the same set twice lands on the same permissions as
        // revoking it once.
        #[test]
        fn revoke_is_idempotent(
            stored in proptest::collection::hash_set(
                proptest::sample::select(Permission::ALL),
                0..10,
            ),
            removed in proptest::collection::vec(
                proptest::sample::select(Permission::ALL),
                0..10,
            ),
        ) {
            let store = InMemoryUserStore::new();
            let target = seed_user(
                &store,
                "prop@example.com",
                Some(Department::Fleet),
                &stored.iter().copied().collect::<Vec<_>>(),
                false,
            );
            let actor = super_admin();
            let request: Vec<String> =
                removed.iter().map(|p| p.as_str().to_string()).collect();

            let first = revoke(&store, Some(&actor), &target.id, &request, Utc::now())
                .unwrap()
                .permissions;
            let second = revoke(&store, Some(&actor), &target.id, &request, Utc::now())
                .unwrap()
                .permissions;

            prop_assert_eq!(&first, &second);
            let removed_set: HashSet<Permission> = removed.iter().copied().collect();
            let expected: HashSet<Permission> =
                stored.difference(&removed_set).copied().collect();
            prop_assert_eq!(first, expected);
        }
    }
}
