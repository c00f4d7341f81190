//! Bearer token authorization for protected routes
//!
//! The pipeline runs in a fixed order and stops at the first failure:
//!
//! - [`extract_bearer_token`] reads `Authorization: Bearer <token>`
//! - [`JwksClient`] resolves the signing key named by the token's `kid`
//! - [`TokenVerifier`] checks the RS256 signature, expiry, audience and issuer
//! - [`check_permission`] looks for the route's tag in the `permissions` claim
//!
//! [`Authorizer`] composes the stages and [`RequirePermission`] attaches them
//! to a route.
//!
//! # Example
//!
//! ```ignore
//! use axum::{routing::post, Router};
//! use casting_agency::auth::{Claims, RequirePermission};
//!
//! let app = Router::new().route(
//!     "/film",
//!     post(create_film).route_layer(RequirePermission::new(authorizer, "post:film")),
//! );
//! ```

pub mod authorizer;
pub mod claims;
pub mod error;
pub mod header;
pub mod jwks;
pub mod middleware;
pub mod verifier;

#[cfg(test)]
pub(crate) mod fixtures;

pub use authorizer::Authorizer;
pub use claims::{check_permission, ClaimSet, Claims, MissingClaims, PERMISSIONS_CLAIM};
pub use error::{AuthError, PermissionFailure};
pub use header::extract_bearer_token;
pub use jwks::{JwksClient, KeySet, PublishedKey, SigningKey};
pub use middleware::{RequirePermission, RequirePermissionMiddleware};
pub use verifier::TokenVerifier;

/// Permission tags understood by the casting agency routes
pub mod permissions {
    pub const GET_FILM: &str = "get:film";
    pub const POST_FILM: &str = "post:film";
    pub const PATCH_FILM: &str = "patch:film";
    pub const DELETE_FILM: &str = "delete:film";
    pub const GET_ACTOR: &str = "get:actor";
    pub const POST_ACTOR: &str = "post:actor";
    pub const PATCH_ACTOR: &str = "patch:actor";
    pub const DELETE_ACTOR: &str = "delete:actor";
}
