//! Coalescing of repeated triggers.
//!
//! One navigation often fires several notifications for the same URL. The
//! first is admitted; repeats within the window are dropped. The window
//! counts from the admitted trigger, not from the latest repeat.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

pub const DEFAULT_WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct Throttle {
    window: Duration,
    admitted: Mutex<HashMap<String, Instant>>,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl Throttle {
    pub fn new(window: Duration) -> Self {
        Self { window, admitted: Mutex::new(HashMap::new()) }
    }

    /// Admit `key` unless it was admitted less than one window ago.
    pub async fn admit(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut admitted = self.admitted.lock().await;
        admitted.retain(|_, at| now.duration_since(*at) < self.window);

        if admitted.contains_key(key) {
            return false;
        }
        admitted.insert(key.to_string(), now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_repeat_within_window_dropped() {
        let throttle = Throttle::default();
        assert!(throttle.admit("https://example.com/a").await);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!throttle.admit("https://example.com/a").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_admits_again_after_window() {
        let throttle = Throttle::default();
        assert!(throttle.admit("https://example.com/a").await);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(!throttle.admit("https://example.com/a").await);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(throttle.admit("https://example.com/a").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let throttle = Throttle::default();
        assert!(throttle.admit("https://example.com/a").await);
        assert!(throttle.admit("https://example.com/b").await);
    }
}
