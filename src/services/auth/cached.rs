//! Opt-in validation cache in front of an `IdentityClient`.
//!
//! - Only positive outcomes are stored, as the principal's JSON.
//! - Keys are `identity:<base64url(sha256(token))>`; the raw token never reaches the cache.
//! - Cache failures count as a miss; the identity service stays the source of truth.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};

use crate::services::auth::identity::IdentityClient;
use crate::services::auth::principal::{BearerToken, Principal, ValidationOutcome};
use crate::services::cache::{CacheClient, CacheError};

const KEY_PREFIX: &str = "identity";

pub struct CachedIdentityClient<C: CacheClient> {
    inner: Arc<dyn IdentityClient>,
    cache: C,
    ttl: Duration,
}

impl<C: CacheClient> CachedIdentityClient<C> {
    pub fn new(inner: Arc<dyn IdentityClient>, cache: C, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }

    /// Drops the cached principal for `token`, forcing the next request to re-validate.
    pub async fn invalidate(&self, token: &BearerToken) -> Result<bool, CacheError> {
        let removed = self.cache.del(&cache_key(token)).await?;
        Ok(removed > 0)
    }

    async fn lookup(&self, key: &str) -> Option<Principal> {
        let raw = match self.cache.get_string(key).await {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!(
                    backend = self.cache.backend_name(),
                    error = %err,
                    "identity cache read failed"
                );
                return None;
            }
        };

        match serde_json::from_str::<Principal>(&raw) {
            Ok(principal) => Some(principal),
            Err(err) => {
                tracing::warn!(error = %err, "discarding undecodable identity cache entry");
                None
            }
        }
    }

    async fn store(&self, key: &str, principal: &Principal) {
        let raw = match serde_json::to_string(principal) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "failed to encode principal for identity cache");
                return;
            }
        };

        if let Err(err) = self.cache.set_with_ttl(key, &raw, self.ttl).await {
            tracing::warn!(
                backend = self.cache.backend_name(),
                error = %err,
                "identity cache write failed"
            );
        }
    }
}

#[async_trait]
impl<C: CacheClient> IdentityClient for CachedIdentityClient<C> {
    async fn check(&self, token: &BearerToken) -> ValidationOutcome {
        let key = cache_key(token);

        if let Some(principal) = self.lookup(&key).await {
            tracing::debug!(username = %principal.username, "identity cache hit");
            return ValidationOutcome::Valid(principal);
        }

        let outcome = self.inner.check(token).await;
        if let ValidationOutcome::Valid(principal) = &outcome {
            self.store(&key, principal).await;
        }

        outcome
    }
}

fn cache_key(token: &BearerToken) -> String {
    let digest = Sha256::digest(token.as_str().as_bytes());
    format!("{KEY_PREFIX}:{}", URL_SAFE_NO_PAD.encode(digest))
}
