use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::services::rate_limit::store::{RateLimitError, RateLimiter};

// Expired windows are swept once the map grows past this.
const SWEEP_THRESHOLD: usize = 10_000;

/// In-process fixed-window limiter. Suitable for a single instance; a
/// multi-instance deployment wants the Valkey backend instead.
pub struct MemoryRateLimiter {
    max_requests: u64,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

struct Window {
    started: Instant,
    count: u64,
}

impl MemoryRateLimiter {
    pub fn new(max_requests: u64, window_seconds: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_seconds.max(1)),
            windows: Mutex::new(HashMap::new()),
        }
    }

    fn hit_at(&self, key: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        if windows.len() > SWEEP_THRESHOLD {
            let window = self.window;
            windows.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        entry.count += 1;
        entry.count <= self.max_requests
    }
}

#[async_trait]
impl RateLimiter for MemoryRateLimiter {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn hit(&self, key: &str) -> Result<bool, RateLimitError> {
        Ok(self.hit_at(key, Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_max_then_denies() {
        let limiter = MemoryRateLimiter::new(3, 60);
        let now = Instant::now();

        assert!(limiter.hit_at("10.0.0.1", now));
        assert!(limiter.hit_at("10.0.0.1", now));
        assert!(limiter.hit_at("10.0.0.1", now));
        assert!(!limiter.hit_at("10.0.0.1", now));
        assert!(!limiter.hit_at("10.0.0.1", now));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = MemoryRateLimiter::new(1, 60);
        let now = Instant::now();

        assert!(limiter.hit_at("10.0.0.1", now));
        assert!(!limiter.hit_at("10.0.0.1", now));
        assert!(limiter.hit_at("10.0.0.2", now));
    }

    #[test]
    fn window_resets_after_elapsing() {
        let limiter = MemoryRateLimiter::new(2, 60);
        let now = Instant::now();

        assert!(limiter.hit_at("10.0.0.1", now));
        assert!(limiter.hit_at("10.0.0.1", now));
        assert!(!limiter.hit_at("10.0.0.1", now));

        let later = now + Duration::from_secs(61);
        assert!(limiter.hit_at("10.0.0.1", later));
        assert!(limiter.hit_at("10.0.0.1", later));
        assert!(!limiter.hit_at("10.0.0.1", later));
    }
}
