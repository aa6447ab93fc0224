//! Valkey backend for the identity validation cache.
//!
//! Entries are principal JSON under hashed token keys, so plain string commands are enough.

use std::time::Duration;

use async_trait::async_trait;
use redis::{Cmd, aio::ConnectionManager};

use crate::services::cache::client::{CacheClient, CacheError, CacheResult};

#[derive(Clone)]
pub struct ValkeyClient {
    manager: ConnectionManager,
}

impl ValkeyClient {
    /// Connects eagerly so a wrong `VALKEY_URL` stops startup instead of every lookup.
    pub async fn new(url: &str) -> Result<Self, CacheError> {
        let connection_failed = |e: redis::RedisError| CacheError::BackendConnection(e.to_string());

        let manager = redis::Client::open(url)
            .map_err(connection_failed)?
            .get_connection_manager()
            .await
            .map_err(connection_failed)?;

        Ok(Self { manager })
    }

    async fn run<T: redis::FromRedisValue>(&self, cmd: &Cmd) -> CacheResult<T> {
        // ConnectionManager clones share one multiplexed connection.
        let mut conn = self.manager.clone();
        cmd.query_async(&mut conn)
            .await
            .map_err(|e| CacheError::BackendCommand(e.to_string()))
    }
}

#[async_trait]
impl CacheClient for ValkeyClient {
    fn backend_name(&self) -> &'static str {
        "valkey"
    }

    async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
        self.run(redis::cmd("GET").arg(key)).await
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        // EX takes whole seconds; a sub-second TTL still lives for one.
        let seconds = ttl.as_secs().max(1);
        self.run(redis::cmd("SET").arg(key).arg(value).arg("EX").arg(seconds))
            .await
    }

    async fn del(&self, key: &str) -> CacheResult<u64> {
        self.run(redis::cmd("DEL").arg(key)).await
    }
}
