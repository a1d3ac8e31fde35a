//! Sliding-window rate limiter with temporary block escalation.
//!
//! Per key (authenticated user id, else client IP) we keep the timestamps of
//! requests inside the trailing window. Hitting the limit does not just
//! reject the request — it blocks the key for twice the window length, so a
//! client hammering the endpoint cannot ride the window edge.
//!
//! Two independently-configured instances are injected into the app state
//! (a low-limit one for anonymous/free callers and a high-limit one for
//! premium callers); handlers pick the instance from the caller's premium
//! flag. State is a mutex-guarded map because handlers run concurrently.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct KeyState {
    requests: Vec<Instant>,
    blocked_until: Option<Instant>,
}

#[derive(Debug)]
pub struct SlidingWindowLimiter {
    max_requests: usize,
    window: Duration,
    state: Mutex<HashMap<String, KeyState>>,
}

impl SlidingWindowLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        SlidingWindowLimiter {
            max_requests,
            window,
            state: Mutex::new(HashMap::new()),
        }
    }

    /// Checks whether a request for `key` is allowed right now, recording it
    /// if so. Rejection at the limit escalates to a block of `2 * window`.
    /// Never fails.
    pub fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let entry = state.entry(key.to_string()).or_default();

        if let Some(blocked_until) = entry.blocked_until {
            if now < blocked_until {
                return false;
            }
            entry.blocked_until = None;
        }

        let window_start = now.checked_sub(self.window).unwrap_or(now);
        entry.requests.retain(|t| *t > window_start);

        if entry.requests.len() >= self.max_requests {
            entry.blocked_until = Some(now + self.window * 2);
            return false;
        }

        entry.requests.push(now);
        true
    }

    /// Seconds until `key` may issue a request again, or `None` when it has
    /// no recorded requests.
    pub fn seconds_until_reset(&self, key: &str) -> Option<u64> {
        let now = Instant::now();
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let entry = state.get_mut(key)?;

        if let Some(blocked_until) = entry.blocked_until {
            if now < blocked_until {
                return Some(blocked_until.duration_since(now).as_secs());
            }
        }

        let oldest = entry.requests.iter().min()?;
        let reset_at = *oldest + self.window;
        if reset_at > now {
            Some(reset_at.duration_since(now).as_secs())
        } else {
            Some(0)
        }
    }

    /// Drops stale keys. Called opportunistically; correctness does not
    /// depend on it, memory growth does.
    pub fn cleanup(&self) {
        let now = Instant::now();
        let window_start = now.checked_sub(self.window).unwrap_or(now);
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.retain(|_, entry| {
            entry.requests.retain(|t| *t > window_start);
            if let Some(blocked_until) = entry.blocked_until {
                if now >= blocked_until {
                    entry.blocked_until = None;
                }
            }
            !entry.requests.is_empty() || entry.blocked_until.is_some()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit_then_rejects() {
        let limiter = SlidingWindowLimiter::new(3, Duration::from_secs(60));
        assert!(limiter.allow("k"));
        assert!(limiter.allow("k"));
        assert!(limiter.allow("k"));
        assert!(!limiter.allow("k"));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = SlidingWindowLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.allow("a"));
        assert!(!limiter.allow("a"));
        assert!(limiter.allow("b"));
    }

    #[test]
    fn test_block_escalation_outlasts_window() {
        let limiter = SlidingWindowLimiter::new(1, Duration::from_millis(40));
        assert!(limiter.allow("k"));
        assert!(!limiter.allow("k")); // sets a 80ms block

        // Past the window but inside the block: still rejected.
        std::thread::sleep(Duration::from_millis(50));
        assert!(!limiter.allow("k"));

        // Past the block expiry: allowed again.
        std::thread::sleep(Duration::from_millis(50));
        assert!(limiter.allow("k"));
    }

    #[test]
    fn test_seconds_until_reset_reports_block() {
        let limiter = SlidingWindowLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.allow("k"));
        assert!(!limiter.allow("k"));
        let remaining = limiter.seconds_until_reset("k").unwrap();
        // Blocked for 2 * window = 120s, allowing for elapsed test time.
        assert!(remaining > 60 && remaining <= 120);
    }

    #[test]
    fn test_seconds_until_reset_unknown_key() {
        let limiter = SlidingWindowLimiter::new(1, Duration::from_secs(60));
        assert_eq!(limiter.seconds_until_reset("nobody"), None);
    }

    #[test]
    fn test_cleanup_drops_idle_keys() {
        let limiter = SlidingWindowLimiter::new(5, Duration::from_millis(10));
        assert!(limiter.allow("k"));
        std::thread::sleep(Duration::from_millis(20));
        limiter.cleanup();
        assert_eq!(limiter.seconds_until_reset("k"), None);
    }

    #[test]
    fn test_shared_across_threads() {
        use std::sync::Arc;
        let limiter = Arc::new(SlidingWindowLimiter::new(100, Duration::from_secs(60)));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        limiter.allow("shared");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        // Exactly at the limit now; the next request must be rejected.
        assert!(!limiter.allow("shared"));
    }
}
