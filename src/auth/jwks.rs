//! Signing key resolution from the identity provider's published key set

use std::{sync::Arc, time::{Duration, Instant}};
use jsonwebtoken::decode_header;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing;

use super::error::AuthError;

/// One entry of a published JSON Web Key Set.
///
/// Only the RSA parameters are read; other members are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedKey {
    pub kid: Option<String>,
    pub kty: String,
    #[serde(rename = "use")]
    pub key_use: Option<String>,
    pub n: Option<String>,
    pub e: Option<String>,
}

/// A published JSON Web Key Set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeySet {
    pub keys: Vec<PublishedKey>,
}

/// Normalized RSA signing key record selected for a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningKey {
    pub kty: String,
    pub kid: String,
    pub key_use: Option<String>,
    pub n: String,
    pub e: String,
}

impl KeySet {
    /// Find the key whose `kid` matches, if it carries RSA components
    pub fn find(&self, kid: &str) -> Option<SigningKey> {
        self.keys
            .iter()
            .filter(|key| key.kid.as_deref() == Some(kid))
            .find_map(|key| match (&key.n, &key.e) {
                (Some(n), Some(e)) => Some(SigningKey {
                    kty: key.kty.clone(),
                    kid: kid.to_string(),
                    key_use: key.key_use.clone(),
                    n: n.clone(),
                    e: e.clone(),
                }),
                _ => {
                    tracing::warn!("Key {} has no RSA components, skipping", kid);
                    None
                }
            })
    }
}

struct CachedKeySet {
    keys: Arc<KeySet>,
    fetched_at: Instant,
}

/// Fetches the key set and selects the key for a token.
///
/// Without a cache TTL every call performs a fresh fetch. With a TTL the
/// fetched set is reused until it ages out. A cached set that lacks the
/// requested `kid` is refetched once to pick up rotated keys, but only when
/// it is older than the minimum refresh interval.
#[derive(Clone)]
pub struct JwksClient {
    http_client: Client,
    jwks_url: String,
    cache_ttl: Option<Duration>,
    min_refresh_interval: Duration,
    cache: Arc<RwLock<Option<CachedKeySet>>>,
}

/// Default minimum age of a cached key set before an unknown `kid` refetches it
pub const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

impl JwksClient {
    /// Create a client for `jwks_url` with a bounded request timeout
    pub fn new(
        jwks_url: impl Into<String>,
        timeout: Duration,
        cache_ttl: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            jwks_url: jwks_url.into(),
            cache_ttl: cache_ttl.filter(|ttl| !ttl.is_zero()),
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            cache: Arc::new(RwLock::new(None)),
        })
    }

    /// Set how old a cached key set must be before an unknown `kid` refetches it
    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// Fetch the key set from the provider, bypassing any cache
    pub async fn fetch_key_set(&self) -> Result<KeySet, AuthError> {
        tracing::debug!("Fetching JWKS from: {}", self.jwks_url);

        let response = self.http_client
            .get(&self.jwks_url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(format!("Failed to fetch JWKS: {}", e)))?;

        if !response.status().is_success() {
            return Err(AuthError::KeySetUnavailable(format!("JWKS fetch failed with status: {}", response.status())));
        }

        let jwks_text = response
            .text()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(format!("Failed to read JWKS response: {}", e)))?;

        serde_json::from_str(&jwks_text)
            .map_err(|e| AuthError::KeySetUnavailable(format!("Failed to parse JWKS: {}", e)))
    }

    async fn key_set(&self, force_refresh: bool) -> Result<Arc<KeySet>, AuthError> {
        let Some(ttl) = self.cache_ttl else {
            return Ok(Arc::new(self.fetch_key_set().await?));
        };

        if !force_refresh {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < ttl {
                    return Ok(cached.keys.clone());
                }
            }
        }

        let keys = Arc::new(self.fetch_key_set().await?);
        {
            let mut cache = self.cache.write().await;
            *cache = Some(CachedKeySet { keys: keys.clone(), fetched_at: Instant::now() });
        }
        Ok(keys)
    }

    async fn refresh_allowed(&self) -> bool {
        match self.cache.read().await.as_ref() {
            Some(cached) => cached.fetched_at.elapsed() >= self.min_refresh_interval,
            None => true,
        }
    }

    /// Resolve the signing key for an unverified token
    pub async fn resolve(&self, token: &str) -> Result<SigningKey, AuthError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!("Unreadable JWT header: {}", e);
            AuthError::MalformedToken
        })?;

        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;

        let keys = self.key_set(false).await?;
        if let Some(key) = keys.find(&kid) {
            tracing::debug!("Selected signing key {}", kid);
            return Ok(key);
        }

        if self.cache_ttl.is_some() {
            if self.refresh_allowed().await {
                tracing::debug!("Key {} not in cached JWKS, refreshing", kid);
                if let Some(key) = self.key_set(true).await?.find(&kid) {
                    return Ok(key);
                }
            } else {
                tracing::debug!("Key {} not in recently fetched JWKS, not refreshing", kid);
            }
        }

        Err(AuthError::UnknownKeyId(kid))
    }
}
