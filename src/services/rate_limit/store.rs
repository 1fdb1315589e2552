use async_trait::async_trait;
use thiserror::Error;

/// Fixed-window request counting.
///
/// Returns:
/// - `Ok(true)`  => under the limit, request may proceed
/// - `Ok(false)` => over the limit for the current window
/// - `Err(_)`    => backend failure (caller decides the failure policy)
#[async_trait]
pub trait RateLimiter: Send + Sync {
    // Backend name for logging/metrics.
    fn backend_name(&self) -> &'static str;

    // Count one hit for `key` and report whether it is still allowed.
    async fn hit(&self, key: &str) -> Result<bool, RateLimitError>;
}

#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("rate limit backend error: {0}")]
    Backend(String),
}
