use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::interval};
use tracing::{debug, info, warn};

use crate::rate_limiter::RateLimiter;

/// Periodically prunes expired rate-limit windows so the counter map does
/// not grow with every client the service has ever seen.
pub struct CleanupService {
    rate_limiter: Arc<RateLimiter>,
    cleanup_interval: Duration,
    handle: Option<JoinHandle<()>>,
}

impl CleanupService {
    pub fn new(rate_limiter: Arc<RateLimiter>, cleanup_interval_seconds: u64) -> Self {
        Self {
            rate_limiter,
            cleanup_interval: Duration::from_secs(cleanup_interval_seconds),
            handle: None,
        }
    }

    pub fn start(&mut self) {
        if self.handle.is_some() {
            warn!("Cleanup service is already running");
            return;
        }

        let rate_limiter = Arc::clone(&self.rate_limiter);
        let interval_duration = self.cleanup_interval;

        let handle = tokio::spawn(async move {
            info!(
                "Starting cleanup service with interval: {:?}",
                interval_duration
            );

            let mut cleanup_interval = interval(interval_duration);

            loop {
                let deleted_count = rate_limiter.cleanup_expired();
                if deleted_count > 0 {
                    info!("Cleaned up {} expired rate limit windows", deleted_count);
                } else {
                    debug!("No expired rate limit windows to clean up");
                }

                cleanup_interval.tick().await;
            }
        });

        self.handle = Some(handle);
        info!("Cleanup service started successfully");
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Cleanup service stopped");
        } else {
            debug!("Cleanup service is not running");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for CleanupService {
    fn drop(&mut self) {
        self.stop();
    }
}
