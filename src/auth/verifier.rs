//! Signature and claim verification for bearer tokens

use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use tracing;

use super::claims::ClaimSet;
use super::error::AuthError;
use super::jwks::SigningKey;

/// The only signature algorithm accepted
pub const ALGORITHM: Algorithm = Algorithm::RS256;

/// Verifies tokens against a resolved signing key
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    audience: String,
    issuer: String,
    leeway_secs: u64,
}

impl TokenVerifier {
    /// Create a verifier for tokens issued by `https://<domain>/` to `audience`
    pub fn new(domain: &str, audience: impl Into<String>, leeway_secs: u64) -> Self {
        Self {
            audience: audience.into(),
            issuer: format!("https://{}/", domain.trim_end_matches('/')),
            leeway_secs,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(ALGORITHM);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);
        validation.validate_nbf = true;
        validation.leeway = self.leeway_secs;
        validation
    }

    /// Verify `token` with `key` and return its decoded claim set
    pub fn verify(&self, token: &str, key: &SigningKey) -> Result<ClaimSet, AuthError> {
        let decoding_key = DecodingKey::from_rsa_components(&key.n, &key.e).map_err(|e| {
            tracing::warn!("Published key {} is not a usable RSA key: {}", key.kid, e);
            AuthError::UnknownKeyId(key.kid.clone())
        })?;

        tracing::debug!("Validating JWT with kid: {}, algorithm: {:?}", key.kid, ALGORITHM);

        let token_data = decode::<ClaimSet>(token, &decoding_key, &self.validation())
            .map_err(|e| {
                tracing::debug!("JWT validation failed: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    ErrorKind::InvalidAudience
                    | ErrorKind::InvalidIssuer
                    | ErrorKind::InvalidSubject
                    | ErrorKind::ImmatureSignature
                    | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims,
                    _ => AuthError::MalformedToken,
                }
            })?;

        Ok(token_data.claims)
    }
}
