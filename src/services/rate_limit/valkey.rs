//! Valkey/Redis-backed fixed window (INCR + EXPIRE on first hit), for
//! deployments with more than one API instance.

use async_trait::async_trait;

use crate::services::rate_limit::store::{RateLimitError, RateLimiter};

#[derive(Clone)]
pub struct ValkeyRateLimiter {
    manager: redis::aio::ConnectionManager,
    // Key prefix to avoid collisions across environments sharing a backend.
    prefix: String,
    max_requests: u64,
    window_seconds: u64,
}

fn backend_err(e: redis::RedisError) -> RateLimitError {
    RateLimitError::Backend(e.to_string())
}

impl ValkeyRateLimiter {
    pub async fn new(
        url: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> Result<Self, RateLimitError> {
        let client = redis::Client::open(url).map_err(backend_err)?;
        let manager = client
            .get_connection_manager()
            .await
            .map_err(backend_err)?;

        Ok(Self {
            manager,
            prefix: "ratelimit".to_string(),
            max_requests,
            window_seconds: window_seconds.max(1),
        })
    }

    fn key(&self, raw: &str) -> String {
        format!("{}:{}", self.prefix, raw)
    }
}

#[async_trait]
impl RateLimiter for ValkeyRateLimiter {
    fn backend_name(&self) -> &'static str {
        "valkey"
    }

    async fn hit(&self, key: &str) -> Result<bool, RateLimitError> {
        let mut conn = self.manager.clone();
        let full_key = self.key(key);

        let count: u64 = redis::cmd("INCR")
            .arg(&full_key)
            .query_async(&mut conn)
            .await
            .map_err(backend_err)?;

        // The first hit opens the window; the key expires with it.
        if count == 1 {
            let _: i64 = redis::cmd("EXPIRE")
                .arg(&full_key)
                .arg(self.window_seconds)
                .query_async(&mut conn)
                .await
                .map_err(backend_err)?;
        }

        Ok(count <= self.max_requests)
    }
}
