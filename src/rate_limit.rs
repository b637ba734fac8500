use std::time::{Duration, Instant};

use dashmap::DashMap;

const MAX_ATTEMPTS: u32 = 5;
const WINDOW: Duration = Duration::from_secs(15 * 60);

/// Per-email login brute force limiter.
///
/// Every attempt is counted up front; a successful login clears the email.
/// The check and the increment happen under one map entry lock, so
/// concurrent attempts cannot slip past the limit together.
pub struct LoginRateLimiter {
    /// email -> (attempt_count, window_start)
    entries: DashMap<String, (u32, Instant)>,
    max_attempts: u32,
    window: Duration,
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginRateLimiter {
    pub fn new() -> Self {
        Self::with_limits(MAX_ATTEMPTS, WINDOW)
    }

    pub fn with_limits(max_attempts: u32, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_attempts,
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Claim a login attempt for `email`. Returns the seconds left in the
    /// window when the limit is already reached.
    pub fn try_attempt(&self, email: &str) -> Result<(), u64> {
        let now = Instant::now();

        let mut entry = self.entries.entry(email.to_lowercase()).or_insert((0, now));
        let (count, start) = entry.value_mut();

        if now.duration_since(*start) > self.window {
            *count = 1;
            *start = now;
            return Ok(());
        }

        if *count >= self.max_attempts {
            let elapsed = now.duration_since(*start).as_secs();
            return Err(self.window.as_secs().saturating_sub(elapsed));
        }

        *count += 1;
        Ok(())
    }

    /// Forget an email after a successful login.
    pub fn reset(&self, email: &str) {
        self.entries.remove(&email.to_lowercase());
    }

    pub fn cleanup(&self, max_age: Duration) {
        let now = Instant::now();
        self.entries.retain(|_, (_, start)| now.duration_since(*start) < max_age);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
