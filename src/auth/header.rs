//! Bearer token extraction from request headers

use http::{header::AUTHORIZATION, HeaderMap};

use super::error::AuthError;

/// Extract the bearer token from the `Authorization` header.
///
/// The header is split on whitespace and must consist of exactly the
/// `Bearer` scheme followed by one token. The token is returned as given.
///
/// # Example
///
/// ```rust
/// use http::HeaderMap;
/// use casting_agency::auth::extract_bearer_token;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("Authorization", "Bearer my-token".parse().unwrap());
///
/// assert_eq!(extract_bearer_token(&headers).unwrap(), "my-token");
/// ```
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::AuthorizationHeaderMissing)?;

    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidHeader("Authorisation header is not valid text"))?;

    let mut sections = value.split_whitespace();
    match sections.next() {
        Some("Bearer") => {}
        Some(_) => {
            return Err(AuthError::InvalidHeader(
                "Authorisation header needs to include Bearer prefix",
            ))
        }
        // An all-whitespace header carries no credential at all
        None => return Err(AuthError::AuthorizationHeaderMissing),
    }

    let token = sections
        .next()
        .ok_or(AuthError::InvalidHeader("Token missing in authorisation header"))?;

    if sections.next().is_some() {
        return Err(AuthError::InvalidHeader(
            "Authorisation header has too many sections",
        ));
    }

    Ok(token)
}
