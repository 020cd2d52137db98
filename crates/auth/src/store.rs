//! Persistence seam for user records.
//!
//! The lifecycle manager only ever issues single-record find/save calls, so
//! the trait mirrors that: each `save` replaces the whole record atomically
//! (the backing store's per-document update semantics serialize concurrent
//! writers; last write wins).

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use fleetdesk_core::UserId;

use crate::catalog::Department;
use crate::user::User;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("user not found")]
    NotFound,

    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Single-document user persistence.
pub trait UserStore: Send + Sync {
    fn find_by_id(&self, id: &UserId) -> Option<User>;

    fn find_by_email(&self, email: &str) -> Option<User>;

    /// Insert a new record; fails on a duplicate email.
    fn insert(&self, user: User) -> Result<(), StoreError>;

    /// Replace an existing record in one atomic write.
    fn save(&self, user: User) -> Result<(), StoreError>;

    fn delete(&self, id: &UserId) -> Result<(), StoreError>;

    fn list(&self) -> Vec<User>;

    /// Active users of one department.
    fn list_by_department(&self, department: Department) -> Vec<User>;
}

/// In-memory store for the dev wiring and tests.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for InMemoryUserStore {
    fn find_by_id(&self, id: &UserId) -> Option<User> {
        self.inner.read().unwrap().get(id).cloned()
    }

    fn find_by_email(&self, email: &str) -> Option<User> {
        self.inner
            .read()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    fn insert(&self, user: User) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        if inner.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail(user.email));
        }
        inner.insert(user.id, user);
        Ok(())
    }

    fn save(&self, user: User) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        if !inner.contains_key(&user.id) {
            return Err(StoreError::NotFound);
        }
        inner.insert(user.id, user);
        Ok(())
    }

    fn delete(&self, id: &UserId) -> Result<(), StoreError> {
        self.inner
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    fn list(&self) -> Vec<User> {
        let mut users: Vec<User> = self.inner.read().unwrap().values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        users
    }

    fn list_by_department(&self, department: Department) -> Vec<User> {
        let mut users: Vec<User> = self
            .inner
            .read()
            .unwrap()
            .values()
            .filter(|u| u.department == Some(department) && u.is_active)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::NewUser;
    use chrono::Utc;
    use std::collections::HashSet;

    fn user(email: &str, department: Department) -> User {
        User::create(
            NewUser {
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                phone_number: "+10000000000".to_string(),
                email: email.to_string(),
                department: Some(department),
                permissions: HashSet::new(),
                is_super_admin: false,
                is_administrator: false,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn insert_rejects_duplicate_email() {
        let store = InMemoryUserStore::new();
        store.insert(user("dup@example.com", Department::Fleet)).unwrap();

        let err = store
            .insert(user("dup@example.com", Department::Finance))
            .unwrap_err();
        assert_eq!(err, StoreError::DuplicateEmail("dup@example.com".to_string()));
    }

    #[test]
    fn save_requires_an_existing_record() {
        let store = InMemoryUserStore::new();
        let u = user("ghost@example.com", Department::Crm);
        assert_eq!(store.save(u), Err(StoreError::NotFound));
    }

    #[test]
    fn department_listing_excludes_inactive_users() {
        let store = InMemoryUserStore::new();
        let active = user("active@example.com", Department::Logistics);
        let mut inactive = user("inactive@example.com", Department::Logistics);
        inactive.is_active = false;

        store.insert(active.clone()).unwrap();
        store.insert(inactive).unwrap();

        let listed = store.list_by_department(Department::Logistics);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, active.id);
    }
}
