//! # Sliding-Window Rate Limiter
//!
//! Per-key request accounting over a trailing time window. Each protected
//! concern (classifier budget, chat burst, chat daily quota) gets its own
//! independently configured instance; instances share nothing.
//!
//! `check` prunes timestamps older than the window before deciding, so the
//! window slides continuously with the clock. `cleanup` drops keys with no
//! in-window activity and is meant to be driven by an external periodic
//! task (see [`crate::orchestration::scheduler`]).

use dashmap::DashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window: Duration,
}

#[derive(Debug)]
pub struct RateLimiter {
    requests: DashMap<String, Vec<Instant>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            requests: DashMap::new(),
            config,
        }
    }

    /// Admit or reject one request for `key`, recording it when admitted.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut times = self.requests.entry(key.to_string()).or_default();

        times.retain(|t| now.duration_since(*t) < self.config.window);

        if times.len() >= self.config.max_requests {
            return false;
        }

        times.push(now);
        true
    }

    /// Requests still available for `key` in the current window.
    pub fn remaining(&self, key: &str) -> usize {
        let now = Instant::now();
        let in_window = self
            .requests
            .get(key)
            .map(|times| {
                times
                    .iter()
                    .filter(|t| now.duration_since(**t) < self.config.window)
                    .count()
            })
            .unwrap_or(0);

        self.config.max_requests.saturating_sub(in_window)
    }

    /// Forget all recorded requests for `key`.
    pub fn reset(&self, key: &str) {
        self.requests.remove(key);
    }

    /// Drop keys with no activity inside the current window.
    pub fn cleanup(&self) {
        let now = Instant::now();
        let window = self.config.window;
        self.requests
            .retain(|_, times| times.iter().any(|t| now.duration_since(*t) < window));
    }

    /// Number of keys currently tracked, pruned or not.
    pub fn tracked_keys(&self) -> usize {
        self.requests.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn limiter(max_requests: usize, window_ms: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            max_requests,
            window: Duration::from_millis(window_ms),
        })
    }

    #[test]
    fn admits_up_to_max_then_rejects() {
        let limiter = limiter(3, 1000);

        assert!(limiter.check("user-1"));
        assert!(limiter.check("user-1"));
        assert!(limiter.check("user-1"));
        assert!(!limiter.check("user-1"));
    }

    #[test]
    fn window_elapse_readmits() {
        let limiter = limiter(3, 100);

        for _ in 0..3 {
            assert!(limiter.check("user-1"));
        }
        assert!(!limiter.check("user-1"));

        sleep(Duration::from_millis(130));
        assert!(limiter.check("user-1"));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = limiter(1, 1000);

        assert!(limiter.check("user-1"));
        assert!(limiter.check("user-2"));
        assert!(!limiter.check("user-1"));
    }

    #[test]
    fn remaining_reflects_window_state() {
        let limiter = limiter(3, 1000);
        assert_eq!(limiter.remaining("user-1"), 3);

        limiter.check("user-1");
        limiter.check("user-1");
        assert_eq!(limiter.remaining("user-1"), 1);
    }

    #[test]
    fn reset_clears_a_single_key() {
        let limiter = limiter(1, 1000);
        assert!(limiter.check("user-1"));
        assert!(!limiter.check("user-1"));

        limiter.reset("user-1");
        assert!(limiter.check("user-1"));
    }

    #[test]
    fn cleanup_drops_idle_keys() {
        let limiter = limiter(5, 50);
        limiter.check("user-1");
        limiter.check("user-2");
        assert_eq!(limiter.tracked_keys(), 2);

        sleep(Duration::from_millis(80));
        limiter.cleanup();
        assert_eq!(limiter.tracked_keys(), 0);
    }
}
