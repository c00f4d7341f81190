//! The authorization pipeline: extract, resolve, verify, check

use http::HeaderMap;
use std::time::Duration;

use super::claims::{check_permission, ClaimSet};
use super::error::AuthError;
use super::header::extract_bearer_token;
use super::jwks::JwksClient;
use super::verifier::TokenVerifier;
use crate::config::AuthConfig;
use crate::error::Result;

/// Runs every authorization stage in order, stopping at the first failure
#[derive(Clone)]
pub struct Authorizer {
    keys: JwksClient,
    verifier: TokenVerifier,
}

impl Authorizer {
    pub fn new(keys: JwksClient, verifier: TokenVerifier) -> Self {
        Self { keys, verifier }
    }

    /// Build the pipeline from the `[auth]` configuration section
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let cache_ttl = match config.jwks_cache_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        let keys = JwksClient::new(
            config.jwks_url(),
            Duration::from_secs(config.jwks_timeout_secs),
            cache_ttl,
        )?
        .with_min_refresh_interval(Duration::from_secs(config.jwks_min_refresh_secs));
        let verifier = TokenVerifier::new(&config.domain, config.audience.clone(), config.leeway_secs);

        tracing::info!(
            jwks_url = %keys.jwks_url(),
            issuer = %verifier.issuer(),
            audience = %verifier.audience(),
            cache_ttl_secs = config.jwks_cache_ttl_secs,
            "Authorization pipeline configured"
        );

        Ok(Self::new(keys, verifier))
    }

    /// Authorize a request carrying `headers` for `permission`.
    ///
    /// Returns the verified claim set unchanged on success.
    pub async fn authorize(&self, permission: &str, headers: &HeaderMap) -> std::result::Result<ClaimSet, AuthError> {
        let token = extract_bearer_token(headers)?;
        let key = self.keys.resolve(token).await?;
        let claims = self.verifier.verify(token, &key)?;
        check_permission(permission, &claims)?;
        Ok(claims)
    }
}
