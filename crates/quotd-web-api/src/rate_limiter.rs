use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limit exceeded: {requests} requests in window, limit is {limit}")]
    LimitExceeded { requests: i64, limit: i64 },
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window_ms: i64,
    pub max_requests: i64,
    pub cleanup_interval_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: 60_000,
            max_requests: 60,
            cleanup_interval_seconds: 3600, // Cleanup every hour
        }
    }
}

/// Fixed-window request counter keyed by client identifier.
///
/// The whole service is a read-only in-memory collection, so the windows
/// live in an in-process map rather than external storage. Counters for a
/// past window stay around until [`RateLimiter::cleanup_expired`] prunes
/// them.
#[derive(Debug)]
pub struct RateLimiter {
    windows: DashMap<(String, i64), i64>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: DashMap::new(),
            config,
        }
    }

    pub fn check_and_increment(&self, identifier: &str) -> Result<(), RateLimitError> {
        let window_start = self.window_start(current_timestamp_ms());

        let mut entry = self
            .windows
            .entry((identifier.to_string(), window_start))
            .or_insert(0);
        *entry += 1;
        let current_count = *entry;
        drop(entry);

        debug!(
            "Rate limit check for '{}': {}/{} requests in current window",
            identifier, current_count, self.config.max_requests
        );

        if current_count > self.config.max_requests {
            return Err(RateLimitError::LimitExceeded {
                requests: current_count,
                limit: self.config.max_requests,
            });
        }

        Ok(())
    }

    /// Request count for the identifier in the current window, if any.
    pub fn get_current_usage(&self, identifier: &str) -> Option<i64> {
        let window_start = self.window_start(current_timestamp_ms());
        self.windows
            .get(&(identifier.to_string(), window_start))
            .map(|entry| *entry)
    }

    pub fn reset_limit(&self, identifier: &str) {
        let window_start = self.window_start(current_timestamp_ms());
        self.windows.remove(&(identifier.to_string(), window_start));
        debug!("Reset rate limit for identifier '{}'", identifier);
    }

    /// Drops counters whose window has passed. Returns the number removed.
    pub fn cleanup_expired(&self) -> u64 {
        let now = current_timestamp_ms();
        let before = self.windows.len();
        self.windows
            .retain(|(_, window_start), _| *window_start + self.config.window_ms > now);
        let removed = before.saturating_sub(self.windows.len()) as u64;

        if removed > 0 {
            debug!("Cleaned up {} expired rate limit windows", removed);
        }

        removed
    }

    #[cfg(test)]
    pub(crate) fn insert_window_for_test(&self, identifier: &str, window_start: i64, count: i64) {
        self.windows
            .insert((identifier.to_string(), window_start), count);
    }

    #[cfg(test)]
    pub(crate) fn window_count_for_test(&self) -> usize {
        self.windows.len()
    }

    fn window_start(&self, timestamp_ms: i64) -> i64 {
        (timestamp_ms / self.config.window_ms) * self.config.window_ms
    }

    pub fn max_requests(&self) -> i64 {
        self.config.max_requests
    }

    pub fn window_ms(&self) -> i64 {
        self.config.window_ms
    }

    /// Seconds a throttled client should wait, rounded up.
    pub fn retry_after_seconds(&self) -> i64 {
        (self.config.window_ms as u64).div_ceil(1000) as i64
    }
}

pub fn current_timestamp_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as i64
}
