/// Factory: build the identity client stack from application `Config`.
use std::{sync::Arc, time::Duration};

use anyhow::Context;

use crate::config::AuthServiceConfig;
use crate::services::auth::{CachedIdentityClient, HttpIdentityClient, IdentityClient};
use crate::services::cache::ValkeyClient;

pub async fn build_identity_client(
    config: &AuthServiceConfig,
) -> anyhow::Result<Arc<dyn IdentityClient>> {
    let http = HttpIdentityClient::new(
        &config.base_url,
        config.connect_timeout,
        config.request_timeout,
    )
    .context("building identity service client")?;

    tracing::info!(url = %http.validate_url(), "identity service configured");

    let http: Arc<dyn IdentityClient> = Arc::new(http);

    let Some(valkey_url) = config.valkey_url.as_deref().filter(|_| config.cache_enabled()) else {
        return Ok(http);
    };

    let cache = ValkeyClient::new(valkey_url)
        .await
        .context("connecting identity cache")?;

    tracing::info!(
        ttl_seconds = config.cache_ttl_seconds,
        "identity validation cache enabled"
    );

    Ok(Arc::new(CachedIdentityClient::new(
        http,
        cache,
        Duration::from_secs(config.cache_ttl_seconds),
    )))
}
