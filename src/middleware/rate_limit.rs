///! Sliding-window limiter for feedback submissions, keyed by visitor slot
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone)]
pub struct RateLimiter {
    hits: Arc<RwLock<HashMap<Uuid, Vec<Instant>>>>,
    max_hits: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_hits: usize, window: Duration) -> Self {
        Self {
            hits: Arc::new(RwLock::new(HashMap::new())),
            max_hits,
            window,
        }
    }

    /// Records a hit for `slot` if it is still under the limit.
    pub async fn check(&self, slot: Uuid) -> bool {
        let now = Instant::now();
        let mut hits = self.hits.write().await;
        let history = hits.entry(slot).or_default();
        history.retain(|&at| now.duration_since(at) < self.window);

        if history.len() < self.max_hits {
            history.push(now);
            true
        } else {
            false
        }
    }

    /// Forgets slots with no hits inside the window.
    pub async fn prune(&self) -> usize {
        let now = Instant::now();
        let mut hits = self.hits.write().await;
        let before = hits.len();
        hits.retain(|_, history| {
            history.retain(|&at| now.duration_since(at) < self.window);
            !history.is_empty()
        });
        before - hits.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_per_slot() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let slot = Uuid::new_v4();

        assert!(limiter.check(slot).await);
        assert!(limiter.check(slot).await);
        assert!(limiter.check(slot).await);
        assert!(!limiter.check(slot).await);

        assert!(limiter.check(Uuid::new_v4()).await);
    }

    #[tokio::test]
    async fn test_prune() {
        let limiter = RateLimiter::new(5, Duration::from_millis(20));
        limiter.check(Uuid::new_v4()).await;
        limiter.check(Uuid::new_v4()).await;

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(limiter.prune().await, 2);
        assert_eq!(limiter.prune().await, 0);
    }
}
