use axum::extract::FromRequestParts;
use axum::response::{IntoResponse, Response};
use http::request::Parts;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::Deref;

use super::error::{error_body, AuthError, PermissionFailure, INTERNAL_ERROR_MESSAGE};

/// Name of the claim carrying the granted permission tags
pub const PERMISSIONS_CLAIM: &str = "permissions";

/// Decoded token payload, kept exactly as issued
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(pub Map<String, Value>);

impl ClaimSet {
    /// Subject of the token, if present
    pub fn subject(&self) -> Option<&str> {
        self.0.get("sub").and_then(Value::as_str)
    }

    /// Permission tags, or `None` when the claim is missing or not a list.
    /// Non-string entries are skipped.
    pub fn permissions(&self) -> Option<Vec<&str>> {
        match self.0.get(PERMISSIONS_CLAIM)? {
            Value::Array(items) => Some(items.iter().filter_map(Value::as_str).collect()),
            _ => None,
        }
    }

}

impl From<Map<String, Value>> for ClaimSet {
    fn from(claims: Map<String, Value>) -> Self {
        Self(claims)
    }
}

/// Check that `claims` grant `permission`.
///
/// A claim set without a readable permission list cannot be evaluated and
/// fails as unauthorized; a readable list lacking the tag fails as forbidden.
pub fn check_permission(permission: &str, claims: &ClaimSet) -> Result<(), AuthError> {
    let granted = claims
        .permissions()
        .ok_or(AuthError::InvalidPermissions(PermissionFailure::Unevaluable))?;

    if granted.contains(&permission) {
        tracing::debug!("{} in {:?}", permission, granted);
        Ok(())
    } else {
        Err(AuthError::InvalidPermissions(PermissionFailure::Forbidden))
    }
}

/// Axum extractor for the verified claim set.
///
/// The claims are inserted by [`RequirePermission`](super::RequirePermission);
/// a handler using this extractor on an unguarded route is a wiring bug and
/// yields an internal error.
#[derive(Debug, Clone)]
pub struct Claims(pub ClaimSet);

impl Deref for Claims {
    type Target = ClaimSet;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Claims {
    pub fn into_inner(self) -> ClaimSet {
        self.0
    }
}

impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = MissingClaims;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ClaimSet>()
            .cloned()
            .map(Claims)
            .ok_or(MissingClaims)
    }
}

/// Rejection for [`Claims`] on a route that is not behind
/// [`RequirePermission`](super::RequirePermission)
#[derive(Debug, Clone, Copy)]
pub struct MissingClaims;

impl IntoResponse for MissingClaims {
    fn into_response(self) -> Response {
        tracing::error!("Claims extracted on a route without RequirePermission");
        error_body(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    }
}
