//! `fleetdesk-auth` — permission catalog and authorization core.
//!
//! This crate is intentionally decoupled from HTTP and storage: the catalog is
//! static configuration, authorization decisions are pure functions, and the
//! permission lifecycle talks to persistence only through the [`UserStore`]
//! seam.

pub mod authorize;
pub mod catalog;
pub mod claims;
pub mod lifecycle;
pub mod principal;
pub mod store;
pub mod user;

pub use authorize::{authorize, authorize_admin_only, authorize_super_admin_only, AuthzError};
pub use catalog::{defaults_for, parse_permissions, Department, Permission};
pub use claims::{validate_claims, AccessClaims, TokenValidationError};
pub use lifecycle::LifecycleError;
pub use principal::Principal;
pub use store::{InMemoryUserStore, StoreError, UserStore};
pub use user::{NewUser, User};
