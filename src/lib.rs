//! # Casting Agency
//!
//! A small REST API for managing actors and films, guarded by bearer tokens
//! issued by an external identity provider.
//!
//! Every protected route is wrapped in a [`auth::RequirePermission`] layer that
//! runs the authorization pipeline before the handler executes:
//!
//! 1. extract the bearer token from the `Authorization` header
//! 2. resolve the signing key from the provider's published key set
//! 3. verify signature, expiry, audience and issuer
//! 4. check the `permissions` claim for the route's permission tag
//!
//! ## Features
//!
//! - `postgres`: enables [`storage::PostgresStore`] backed by `sqlx`

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use error::{AgencyError, Result};

pub use api::{create_router, AppState};
pub use auth::{Authorizer, AuthError, ClaimSet, Claims, RequirePermission};
pub use config::AgencyConfig;
pub use storage::{CastingStore, MemoryStore, StorageError};

#[cfg(feature = "postgres")]
pub use storage::PostgresStore;
