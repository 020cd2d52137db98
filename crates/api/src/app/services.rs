//! Application state wiring.
//!
//! The user store is the `fleetdesk-auth` seam (in-memory by default; a
//! document store can be swapped in behind the same trait). The driver
//! registry is API-local state for the permission-guarded fleet slice.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fleetdesk_auth::{InMemoryUserStore, UserStore};
use fleetdesk_core::DriverId;

use crate::token::TokenCodec;

pub struct AppServices {
    pub users: Arc<dyn UserStore>,
    pub drivers: DriverRegistry,
    pub codec: TokenCodec,
}

pub fn build_services(jwt_secret: &str) -> AppServices {
    AppServices {
        users: Arc::new(InMemoryUserStore::new()),
        drivers: DriverRegistry::default(),
        codec: TokenCodec::new(jwt_secret.as_bytes()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Driver Registry
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    #[default]
    Available,
    OnTrip,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub full_name: String,
    pub phone_number: String,
    pub license_number: String,
    pub status: DriverStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct DriverRegistry {
    inner: RwLock<HashMap<DriverId, Driver>>,
}

impl DriverRegistry {
    pub fn list(&self) -> Vec<Driver> {
        let mut drivers: Vec<Driver> = self.inner.read().unwrap().values().cloned().collect();
        drivers.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        drivers
    }

    pub fn get(&self, id: &DriverId) -> Option<Driver> {
        self.inner.read().unwrap().get(id).cloned()
    }

    pub fn insert(&self, driver: Driver) {
        self.inner.write().unwrap().insert(driver.id, driver);
    }

    pub fn save(&self, driver: Driver) -> bool {
        let mut inner = self.inner.write().unwrap();
        if !inner.contains_key(&driver.id) {
            return false;
        }
        inner.insert(driver.id, driver);
        true
    }

    pub fn delete(&self, id: &DriverId) -> bool {
        self.inner.write().unwrap().remove(id).is_some()
    }
}
