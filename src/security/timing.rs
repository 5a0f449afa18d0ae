//! Timing attack protection utilities

use std::time::{Duration, Instant};

/// Constant-time string comparison. Only the length leaks.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (byte_a, byte_b) in a.bytes().zip(b.bytes()) {
        result |= byte_a ^ byte_b;
    }

    result == 0
}

/// Pads an operation to a minimum duration so failures take as long as
/// the slowest path
pub struct AuthTimer {
    start: Instant,
    min_duration: Duration,
}

impl AuthTimer {
    pub fn new(min_duration: Duration) -> Self {
        Self {
            start: Instant::now(),
            min_duration,
        }
    }

    /// Wait until minimum duration has elapsed
    pub async fn wait(self) {
        let elapsed = self.start.elapsed();
        if elapsed < self.min_duration {
            tokio::time::sleep(self.min_duration - elapsed).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("f271c81ff7084ee5b99a5091b42d486e", "f271c81ff7084ee5b99a5091b42d486e"));
        assert!(!constant_time_eq("hello", "world"));
        assert!(!constant_time_eq("hello", "hell"));
        assert!(!constant_time_eq("", "a"));
    }

    #[tokio::test]
    async fn test_auth_timer() {
        let start = Instant::now();
        AuthTimer::new(Duration::from_millis(10)).wait().await;
        assert!(start.elapsed() >= Duration::from_millis(10));
    }
}
