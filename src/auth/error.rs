use http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Why a permission check could not pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionFailure {
    /// Claims are well-formed but do not grant the permission
    Forbidden,
    /// The `permissions` claim is missing or is not a list
    Unevaluable,
}

/// Errors raised by the authorization pipeline.
///
/// The `Display` text of each variant is the description returned to the
/// caller, so it must never carry internal detail.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header on the request
    #[error("Authorisation header is missing")]
    AuthorizationHeaderMissing,

    /// The header is present but is not `Bearer <token>`
    #[error("{0}")]
    InvalidHeader(&'static str),

    /// The unverified token header has no `kid`
    #[error("Token does not contain a Key ID (kid) and so cannot be verified.")]
    MissingKeyId,

    /// No published key matches the token's `kid`
    #[error("Unable to find the appropriate key.")]
    UnknownKeyId(String),

    /// Audience, issuer or a required claim is wrong
    #[error("There is a problem with the claims.")]
    InvalidClaims,

    /// The token could not be decoded or its signature did not verify
    #[error("Unable to parse authentication token.")]
    MalformedToken,

    #[error("The token has expired and can no longer be used.")]
    TokenExpired,

    #[error("User doesn't have permission.")]
    InvalidPermissions(PermissionFailure),

    /// The key set could not be fetched; the detail is logged, not returned
    #[error("Unable to fetch the signing key set.")]
    KeySetUnavailable(String),
}

impl AuthError {
    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::AuthorizationHeaderMissing => "authorization_header_missing",
            AuthError::InvalidHeader(_) => "invalid_header",
            AuthError::MissingKeyId
            | AuthError::UnknownKeyId(_)
            | AuthError::InvalidClaims
            | AuthError::MalformedToken => "invalid_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidPermissions(_) => "invalid_permissions",
            AuthError::KeySetUnavailable(_) => "jwks_unavailable",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MalformedToken => StatusCode::BAD_REQUEST,
            AuthError::InvalidPermissions(PermissionFailure::Forbidden) => StatusCode::FORBIDDEN,
            AuthError::KeySetUnavailable(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Message returned for every internal failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Build the JSON error body shared by every failing response
pub fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    let body = json!({
        "Success": "False",
        "Error": status.as_u16(),
        "Message": message.into(),
    });
    (status, Json(body)).into_response()
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::warn!(code = self.code(), status = status.as_u16(), "Request rejected: {:?}", self);
        error_body(status, self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_missing_error() {
        let err = AuthError::AuthorizationHeaderMissing;
        assert_eq!(err.to_string(), "Authorisation header is missing");
        assert_eq!(err.code(), "authorization_header_missing");
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_malformed_token_is_bad_request() {
        let err = AuthError::MalformedToken;
        assert_eq!(err.code(), "invalid_token");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_claim_problems_are_unauthorized() {
        for err in [
            AuthError::MissingKeyId,
            AuthError::UnknownKeyId("abc".to_string()),
            AuthError::InvalidClaims,
        ] {
            assert_eq!(err.code(), "invalid_token");
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_permission_sub_kinds() {
        let forbidden = AuthError::InvalidPermissions(PermissionFailure::Forbidden);
        let unevaluable = AuthError::InvalidPermissions(PermissionFailure::Unevaluable);
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(unevaluable.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(forbidden.code(), unevaluable.code());
    }

    #[test]
    fn test_key_set_detail_not_in_message() {
        let err = AuthError::KeySetUnavailable("connection refused at 10.0.0.1".to_string());
        assert!(!err.to_string().contains("10.0.0.1"));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_response_body_shape() {
        let response = AuthError::TokenExpired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["Success"], "False");
        assert_eq!(body["Error"], 401);
        assert_eq!(body["Message"], "The token has expired and can no longer be used.");
    }
}
