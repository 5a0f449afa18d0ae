//! Visit counting for the static file server
//!
//! The counter is owned by the HTTP layer and shared by handle; nothing in
//! the auth core touches it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counter interface so the backing implementation can be swapped
pub trait HitCounter: Send + Sync {
    fn increment(&self) -> u64;
    fn load(&self) -> u64;
    fn reset(&self);
}

/// Lock-free in-process counter
#[derive(Debug, Default)]
pub struct AtomicHitCounter {
    hits: AtomicU64,
}

impl AtomicHitCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HitCounter for AtomicHitCounter {
    /// Returns the count after this hit
    fn increment(&self) -> u64 {
        self.hits.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn load(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
    }
}

pub type SharedHitCounter = Arc<dyn HitCounter>;

/// Admin page showing the visit count
pub fn render_metrics_page(hits: u64) -> String {
    format!(
        r#"<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
  </body>
</html>
"#,
        hits
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_and_reset() {
        let counter = AtomicHitCounter::new();
        assert_eq!(counter.increment(), 1);
        assert_eq!(counter.increment(), 2);
        assert_eq!(counter.load(), 2);
        counter.reset();
        assert_eq!(counter.load(), 0);
    }

    #[test]
    fn test_concurrent_increments() {
        let counter = Arc::new(AtomicHitCounter::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = counter.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        counter.increment();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(counter.load(), 8000);
    }

    #[test]
    fn test_metrics_page() {
        let page = render_metrics_page(42);
        assert!(page.contains("Chirpy has been visited 42 times!"));
    }
}
